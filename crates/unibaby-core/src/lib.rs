//! Core library for the UniBaby Pool storefront.
//!
//! Everything the storefront does that is not drawing to the terminal lives
//! here:
//!
//! - `api`: HTTP client for the storefront backend
//! - `models`: packages, checkout requests/replies, payment status
//! - `catalog`: one-shot package catalog load
//! - `registration`: the registration form draft and its validation
//! - `checkout`: turning a draft into a hosted-payment redirect
//! - `poller`: bounded payment status polling after the redirect returns
//! - `location`: the visible page URL and its `session_id` parameter
//! - `state`: the single UI state container and its actions
//! - `content`: static marketing copy (trainers, contacts, hours)

pub mod api;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod content;
pub mod location;
pub mod models;
pub mod poller;
pub mod registration;
pub mod state;
pub mod utils;
