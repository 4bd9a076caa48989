//! HTTP client for the Canva Connect REST API.
//!
//! Covers the small surface the campaign pipeline needs: creating and
//! polling brand-template autofill jobs, and the OAuth 2.0 authorization
//! code (PKCE) and refresh-token exchanges.

pub mod api;
pub mod config;
pub mod types;

pub use api::{CanvaApi, CanvaApiError};
pub use config::CanvaConfig;
pub use types::{AutofillJob, JobOutcome, TokenResponse};
