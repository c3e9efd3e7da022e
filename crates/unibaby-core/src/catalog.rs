//! One-shot package catalog load.

use tracing::{error, info};

use crate::api::StorefrontBackend;
use crate::models::Catalog;

/// Fetch the package catalog once. A failure is logged and yields an empty
/// catalog so the package list simply renders nothing.
pub async fn load_catalog<B>(backend: &B) -> Catalog
where
    B: StorefrontBackend + ?Sized,
{
    match backend.fetch_packages().await {
        Ok(catalog) => {
            info!(count = catalog.len(), "Package catalog loaded");
            catalog
        }
        Err(e) => {
            error!(error = %e, "Error fetching packages");
            Catalog::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{sample_catalog, FakeBackend};

    #[tokio::test]
    async fn test_load_catalog_returns_backend_packages() {
        let backend = FakeBackend::new().with_catalog(sample_catalog());
        let catalog = load_catalog(&backend).await;
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog, sample_catalog());
        assert_eq!(backend.catalog_calls(), 1);
    }

    #[tokio::test]
    async fn test_load_catalog_failure_is_empty_without_retry() {
        let backend = FakeBackend::new();
        let catalog = load_catalog(&backend).await;
        assert!(catalog.is_empty());
        assert_eq!(backend.catalog_calls(), 1);
    }
}
