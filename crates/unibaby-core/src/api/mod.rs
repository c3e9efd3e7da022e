//! REST API client module for the storefront backend.
//!
//! This module provides the `ApiClient` for communicating with the backend
//! that serves the package catalog, creates hosted checkout sessions and
//! reports their payment status.
//!
//! Flows that talk to the backend take a `StorefrontBackend` so they can be
//! exercised without a network.

pub mod client;
pub mod error;

#[cfg(test)]
pub(crate) mod fake;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Catalog, CheckoutRequest, CheckoutSession, CheckoutStatus};

pub use client::ApiClient;
pub use error::ApiError;

/// The backend operations the storefront flows depend on.
#[async_trait]
pub trait StorefrontBackend: Send + Sync {
    /// `GET /api/packages`
    async fn fetch_packages(&self) -> Result<Catalog>;

    /// `POST /api/checkout/session`
    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession>;

    /// `GET /api/checkout/status/{session_id}`
    async fn fetch_checkout_status(&self, session_id: &str) -> Result<CheckoutStatus>;
}
