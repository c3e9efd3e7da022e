//! The storefront's visible page URL.
//!
//! After paying, the hosted payment page sends the user back to
//! `{origin}/success?session_id=...`. The location carries that session id
//! until the payment status is dismissed, at which point the parameter is
//! stripped without touching the rest of the URL.

use std::fmt;

use anyhow::{Context, Result};
use reqwest::Url;

/// Query parameter the payment page appends on return
pub const SESSION_ID_PARAM: &str = "session_id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    url: Url,
}

impl PageLocation {
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input.trim()).with_context(|| format!("Invalid page URL: {}", input))?;
        Ok(Self { url })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Scheme, host and port, e.g. `https://unibaby-pool.kz`
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// The non-empty `session_id` query parameter, if any
    pub fn session_id(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == SESSION_ID_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    /// The same location with every `session_id` parameter removed.
    /// Other parameters keep their order; an emptied query is dropped.
    pub fn without_session_id(&self) -> Self {
        let kept: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(key, _)| key != SESSION_ID_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut url = self.url.clone();
        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
        Self { url }
    }
}

impl fmt::Display for PageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
