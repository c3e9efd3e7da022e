//! API client for the storefront backend.
//!
//! The backend owns packages, registrations and the payment processor
//! integration. The client only reads the catalog, asks for a hosted checkout
//! session and reads a session's payment status back.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::{Catalog, CheckoutRequest, CheckoutSession, CheckoutStatus, HealthStatus, PackagesResponse};

use super::{ApiError, StorefrontBackend};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for a slow payment processor behind the backend.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Every backend route lives under this path segment
const API_PREFIX: &str = "api";

/// API client for the storefront backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client for the backend at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid backend URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Backend URL cannot be used as a base: {}", base_url);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/api/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Backend URL cannot be used as a base: {}", self.base_url))?
            .pop_if_empty()
            .push(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, url: Url, body: &B) -> Result<T> {
        debug!(url = %url, "POST");
        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    // ===== Endpoints =====

    /// Check that the backend is up
    pub async fn health(&self) -> Result<HealthStatus> {
        self.get(self.endpoint(&["health"])?).await
    }

    /// Fetch the purchasable package catalog
    pub async fn fetch_packages(&self) -> Result<Catalog> {
        let response: PackagesResponse = self.get(self.endpoint(&["packages"])?).await?;
        debug!(count = response.packages.len(), "Packages response received");
        Ok(response.packages)
    }

    /// Ask the backend for a hosted checkout session
    pub async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        let url = self.endpoint(&["checkout", "session"])?;
        let session: CheckoutSession = self.post(url, request).await?;
        if session.checkout_url.is_empty() {
            return Err(ApiError::InvalidResponse("checkout_url is empty".to_string()).into());
        }
        Ok(session)
    }

    /// Read the payment status of a checkout session
    pub async fn fetch_checkout_status(&self, session_id: &str) -> Result<CheckoutStatus> {
        let url = self.endpoint(&["checkout", "status", session_id])?;
        self.get(url).await
    }
}

#[async_trait]
impl StorefrontBackend for ApiClient {
    async fn fetch_packages(&self) -> Result<Catalog> {
        ApiClient::fetch_packages(self).await
    }

    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        ApiClient::create_checkout_session(self, request).await
    }

    async fn fetch_checkout_status(&self, session_id: &str) -> Result<CheckoutStatus> {
        ApiClient::fetch_checkout_status(self, session_id).await
    }
}
