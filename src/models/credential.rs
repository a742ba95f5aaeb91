//! OAuth credential material.

use chrono::{DateTime, Utc};

/// Credential material for the provider session.
///
/// Created empty at first run; the authorization code is set once per login
/// attempt, tokens on successful exchange or refresh, and everything is
/// cleared on logout. Owned exclusively by the auth session; the store only
/// durably mirrors it.
#[derive(Debug, Clone, Default)]
pub struct Credential {
    pub authorization_code: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Whether an access token exists and has not passed its expiry.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match (&self.access_token, self.expires_at) {
            (Some(_), Some(expires_at)) => now < expires_at,
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
