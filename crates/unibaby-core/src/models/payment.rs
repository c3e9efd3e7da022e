/// Where the storefront is in confirming a payment after the redirect returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentStatus {
    #[default]
    Idle,
    Checking,
    Success,
    Expired,
    Timeout,
    Error,
}

impl PaymentStatus {
    /// Terminal statuses only leave through an explicit dismissal.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Success
                | PaymentStatus::Expired
                | PaymentStatus::Timeout
                | PaymentStatus::Error
        )
    }

    /// Whether a status display is shown at all
    pub fn is_visible(&self) -> bool {
        !matches!(self, PaymentStatus::Idle)
    }

    pub fn title(&self) -> &'static str {
        match self {
            PaymentStatus::Idle => "",
            PaymentStatus::Checking => "Checking your payment...",
            PaymentStatus::Success => "Payment successful!",
            PaymentStatus::Expired => "Checkout session expired",
            PaymentStatus::Timeout | PaymentStatus::Error => "Could not confirm payment",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PaymentStatus::Idle => "",
            PaymentStatus::Checking => "Please wait",
            PaymentStatus::Success => "Thank you for your purchase. We will contact you shortly.",
            PaymentStatus::Expired => "Please try again",
            PaymentStatus::Timeout | PaymentStatus::Error => "Please contact us",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Idle => "idle",
            PaymentStatus::Checking => "checking",
            PaymentStatus::Success => "success",
            PaymentStatus::Expired => "expired",
            PaymentStatus::Timeout => "timeout",
            PaymentStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!PaymentStatus::Idle.is_terminal());
        assert!(!PaymentStatus::Checking.is_terminal());
        assert!(PaymentStatus::Success.is_terminal());
        assert!(PaymentStatus::Expired.is_terminal());
        assert!(PaymentStatus::Timeout.is_terminal());
        assert!(PaymentStatus::Error.is_terminal());
    }

    #[test]
    fn test_timeout_and_error_share_contact_message() {
        assert_eq!(PaymentStatus::Timeout.message(), PaymentStatus::Error.message());
        assert_eq!(PaymentStatus::Timeout.message(), "Please contact us");
        assert_eq!(PaymentStatus::Idle.to_string(), "idle");
    }
}
