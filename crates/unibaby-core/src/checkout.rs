//! Checkout initiation: registration draft → hosted payment page.
//!
//! Exactly one backend request per submission. Nothing is sent when no
//! package is selected or the draft does not validate.

use thiserror::Error;
use tracing::{error, info};

use crate::api::StorefrontBackend;
use crate::models::{CheckoutRequest, CheckoutSession};
use crate::registration::{RegistrationDraft, ValidationError};

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("No package selected")]
    NoPackageSelected,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Failed to create checkout session: {0:#}")]
    Backend(anyhow::Error),
}

/// A created checkout session and whether the payment page was opened.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedCheckout {
    pub session: CheckoutSession,
    pub navigated: bool,
}

/// Where a checkout URL gets opened. The storefront performs a full
/// navigation; nothing of the current view survives it.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str) -> anyhow::Result<()>;
}

/// Assemble the checkout request for `selected_package`, with the package id
/// duplicated inside the registration payload.
pub fn build_checkout_request(
    draft: &RegistrationDraft,
    selected_package: Option<&str>,
    origin_url: &str,
) -> Result<CheckoutRequest, CheckoutError> {
    let package_id = selected_package
        .filter(|id| !id.is_empty())
        .ok_or(CheckoutError::NoPackageSelected)?;

    let registration_data = draft.to_registration_data(package_id)?;

    Ok(CheckoutRequest {
        package_id: package_id.to_string(),
        registration_data,
        origin_url: origin_url.to_string(),
    })
}

/// Send one checkout request and hand the returned URL to the navigator.
///
/// A navigation failure does not undo the session: it is logged and the
/// session comes back with `navigated` unset so the caller can show the URL.
pub async fn initiate_checkout<B, N>(
    backend: &B,
    navigator: &N,
    request: &CheckoutRequest,
) -> Result<OpenedCheckout, CheckoutError>
where
    B: StorefrontBackend + ?Sized,
    N: Navigator + ?Sized,
{
    let session = match backend.create_checkout_session(request).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, package_id = %request.package_id, "Error creating checkout session");
            return Err(CheckoutError::Backend(e));
        }
    };

    info!(
        package_id = %request.package_id,
        session_id = ?session.session_id,
        registration_id = ?session.registration_id,
        "Checkout session created, redirecting"
    );

    let navigated = match navigator.navigate(&session.checkout_url) {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, url = %session.checkout_url, "Failed to open checkout page");
            false
        }
    };

    Ok(OpenedCheckout { session, navigated })
}
