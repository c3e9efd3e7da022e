//! In-memory backend for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Catalog, CheckoutRequest, CheckoutSession, CheckoutStatus, Package};

use super::{ApiError, StorefrontBackend};

/// Scripted status replies; `Err` holds the failure message.
pub type ScriptedStatus = std::result::Result<CheckoutStatus, String>;

#[derive(Default)]
pub struct FakeBackend {
    catalog: Option<Catalog>,
    checkout: Mutex<Option<std::result::Result<CheckoutSession, String>>>,
    statuses: Mutex<VecDeque<ScriptedStatus>>,
    pub catalog_calls: AtomicUsize,
    pub checkout_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub last_checkout: Mutex<Option<CheckoutRequest>>,
    pub polled_sessions: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_checkout(self, result: std::result::Result<CheckoutSession, String>) -> Self {
        *self.checkout.lock().unwrap() = Some(result);
        self
    }

    /// Replies served in order; once exhausted every poll sees a pending session.
    pub fn with_statuses(self, statuses: Vec<ScriptedStatus>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn checkout_calls(&self) -> usize {
        self.checkout_calls.load(Ordering::SeqCst)
    }

    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }
}

pub fn pending() -> ScriptedStatus {
    Ok(CheckoutStatus {
        status: Some("open".into()),
        payment_status: Some("unpaid".into()),
        ..Default::default()
    })
}

pub fn paid() -> ScriptedStatus {
    Ok(CheckoutStatus {
        status: Some("complete".into()),
        payment_status: Some("paid".into()),
        amount_total: Some(1_800_000),
        currency: Some("kzt".into()),
        metadata: None,
    })
}

pub fn expired() -> ScriptedStatus {
    Ok(CheckoutStatus {
        status: Some("expired".into()),
        payment_status: Some("unpaid".into()),
        ..Default::default()
    })
}

pub fn sample_catalog() -> Catalog {
    let package = |name: &str, price: f64, sessions: u32| Package {
        name: name.to_string(),
        price,
        currency: Some("kzt".to_string()),
        sessions,
    };
    vec![
        ("baby_splash".to_string(), package("Baby Splash (0-2)", 15000.0, 8)),
        ("junior_swim".to_string(), package("Junior Swim (3-5)", 18000.0, 8)),
        ("aqua_kids".to_string(), package("Aqua Kids (6-12)", 20000.0, 8)),
        ("individual".to_string(), package("Individual lessons", 8000.0, 1)),
    ]
    .into_iter()
    .collect()
}

#[async_trait]
impl StorefrontBackend for FakeBackend {
    async fn fetch_packages(&self) -> Result<Catalog> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        self.catalog
            .clone()
            .ok_or_else(|| ApiError::ServerError("catalog unavailable".into()).into())
    }

    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        self.checkout_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_checkout.lock().unwrap() = Some(request.clone());
        match self.checkout.lock().unwrap().clone() {
            Some(Ok(session)) => Ok(session),
            Some(Err(message)) => Err(ApiError::BadRequest(message).into()),
            None => Err(ApiError::ServerError("checkout not scripted".into()).into()),
        }
    }

    async fn fetch_checkout_status(&self, session_id: &str) -> Result<CheckoutStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.polled_sessions.lock().unwrap().push(session_id.to_string());
        let next = self.statuses.lock().unwrap().pop_front().unwrap_or_else(pending);
        next.map_err(|message| ApiError::ServerError(message).into())
    }
}
