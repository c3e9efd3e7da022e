use serde::{Deserialize, Serialize};

use super::payment::PaymentStatus;

/// Payment status string the backend reports once the charge has settled
pub const PAYMENT_STATUS_PAID: &str = "paid";

/// Checkout status string the backend reports when the hosted page timed out
pub const CHECKOUT_STATUS_EXPIRED: &str = "expired";

/// Registration payload nested inside a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationData {
    /// Parent's name
    pub name: String,
    pub phone: String,
    pub child_name: String,
    pub child_age: u8,
    pub email: Option<String>,
    pub additional_info: Option<String>,
    pub package_id: String,
}

/// `POST /api/checkout/session` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub package_id: String,
    pub registration_data: RegistrationData,
    pub origin_url: String,
}

/// `POST /api/checkout/session` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub checkout_url: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub registration_id: Option<String>,
}

/// `GET /api/checkout/status/{session_id}` reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    /// Amount in minor units (tiyn)
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl CheckoutStatus {
    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some(PAYMENT_STATUS_PAID)
    }

    pub fn is_expired(&self) -> bool {
        self.status.as_deref() == Some(CHECKOUT_STATUS_EXPIRED)
    }

    /// The terminal status this reply resolves to, or `None` to keep polling.
    /// A paid payment wins over an expired session.
    pub fn outcome(&self) -> Option<PaymentStatus> {
        if self.is_paid() {
            Some(PaymentStatus::Success)
        } else if self.is_expired() {
            Some(PaymentStatus::Expired)
        } else {
            None
        }
    }

    /// Amount in major units, if the backend reported one
    pub fn amount_major(&self) -> Option<f64> {
        self.amount_total.map(|minor| minor as f64 / 100.0)
    }
}

/// `GET /api/health` reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
