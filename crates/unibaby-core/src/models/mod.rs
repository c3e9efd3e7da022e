//! Data models for the storefront.
//!
//! - `Package`, `Catalog`: the purchasable lesson packages
//! - `CheckoutRequest`, `RegistrationData`, `CheckoutSession`: checkout wire types
//! - `CheckoutStatus`, `HealthStatus`: backend status replies
//! - `PaymentStatus`: the payment confirmation state shown to the user

pub mod checkout;
pub mod package;
pub mod payment;

pub use checkout::{CheckoutRequest, CheckoutSession, CheckoutStatus, HealthStatus, RegistrationData};
pub use package::{Catalog, CatalogEntry, Package, PackagesResponse};
pub use payment::PaymentStatus;
