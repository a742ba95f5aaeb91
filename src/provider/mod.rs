// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Abstract boundary to the external fitness-data/auth provider.
//!
//! The concrete gateway is chosen at startup and injected as a trait object;
//! nothing else in the crate knows which provider is behind it.

pub mod google_fit;

pub use google_fit::GoogleFitGateway;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::ActivitySample;

/// Tokens returned by a code exchange or refresh.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: String,
    /// Providers typically rotate this only on a full exchange; a refresh
    /// grant may omit it.
    pub refresh_token: Option<String>,
    /// Seconds until the access token expires
    pub expires_in_secs: i64,
}

/// Errors crossing the provider boundary.
///
/// Call sites map these onto the application taxonomy: exchange failures,
/// refresh failures, or a non-blocking "data unavailable" condition.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unparsable response: {0}")]
    Malformed(String),
}

/// Capability set required by the auth session and the progress engine.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Scopes the user must grant for the app to work.
    fn required_scopes(&self) -> &[&'static str];

    /// Login page URL to send the user to; no network call.
    fn authorization_url(&self) -> String;

    async fn exchange_authorization_code(&self, code: &str)
        -> Result<TokenGrant, ProviderError>;

    async fn refresh_access_token(&self, refresh_token: &str)
        -> Result<TokenGrant, ProviderError>;

    /// Step totals bucketed per calendar day over `[start, end]`.
    async fn fetch_daily_activity(
        &self,
        access_token: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ActivitySample>, ProviderError>;
}
