// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth2 session state machine.
//!
//! Drives authorization-code capture, code-for-token exchange, lazy expiry
//! detection and token refresh against the provider gateway. One async mutex
//! guards the state, the credential and every store write, which both keeps
//! read-modify-write atomic and coalesces concurrent callers onto a single
//! in-flight refresh (providers invalidate a refresh token once used, so two
//! racing refreshes would strand one caller).

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::Credential;
use crate::provider::{ProviderGateway, TokenGrant};
use crate::store::PrefsStore;

/// Where the session currently is in the credential lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    AwaitingAuthorizationCode,
    ExchangingCode,
    Authenticated,
    Expired,
    Refreshing,
    /// Recoverable only via an explicit re-login.
    Failed(FailureReason),
}

impl AuthState {
    pub fn name(&self) -> &'static str {
        match self {
            AuthState::Unauthenticated => "unauthenticated",
            AuthState::AwaitingAuthorizationCode => "awaiting_authorization_code",
            AuthState::ExchangingCode => "exchanging_code",
            AuthState::Authenticated => "authenticated",
            AuthState::Expired => "expired",
            AuthState::Refreshing => "refreshing",
            AuthState::Failed(_) => "failed",
        }
    }
}

/// Why the session landed in [`AuthState::Failed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Exchange(String),
    Refresh(String),
}

impl FailureReason {
    fn to_error(&self) -> AppError {
        match self {
            FailureReason::Exchange(msg) => AppError::ExchangeFailed(msg.clone()),
            FailureReason::Refresh(msg) => AppError::RefreshFailed(msg.clone()),
        }
    }
}

struct SessionInner {
    state: AuthState,
    credential: Credential,
}

/// Single-user OAuth session.
pub struct AuthSession {
    provider: Arc<dyn ProviderGateway>,
    store: PrefsStore,
    inner: Mutex<SessionInner>,
}

impl AuthSession {
    /// Restore the session from whatever the store holds.
    ///
    /// A persisted access token with no recorded expiry gets a conservative
    /// "expired an hour ago" timestamp, so the first read always attempts a
    /// refresh rather than trusting a token of unknown age.
    pub fn restore(provider: Arc<dyn ProviderGateway>, store: PrefsStore) -> Result<Self, AppError> {
        let mut credential = store.load_credential()?;

        let state = if credential.access_token.is_some() {
            if credential.expires_at.is_none() {
                credential.expires_at = Some(Utc::now() - Duration::hours(1));
                store.save_credential(&credential)?;
                tracing::warn!("Stored access token has no expiry, treating as already expired");
            }
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };

        tracing::info!(state = state.name(), "Auth session restored");

        Ok(Self {
            provider,
            store,
            inner: Mutex::new(SessionInner { state, credential }),
        })
    }

    /// Begin a login attempt and return the provider authorization URL.
    ///
    /// No network call happens here; the flow continues when the redirect
    /// callback arrives. Allowed from `Unauthenticated` and `Failed` (manual
    /// recovery); re-invoking while already awaiting is idempotent.
    pub async fn start_login(&self) -> Result<String, AppError> {
        let mut inner = self.inner.lock().await;

        match inner.state {
            AuthState::Unauthenticated
            | AuthState::AwaitingAuthorizationCode
            | AuthState::Failed(_) => {
                inner.state = AuthState::AwaitingAuthorizationCode;
                tracing::info!("Login started, awaiting authorization code");
                Ok(self.provider.authorization_url())
            }
            _ => Err(AppError::BadRequest(
                "a session is already established; log out first".to_string(),
            )),
        }
    }

    /// Deliver the redirect callback into the state machine.
    ///
    /// Accepts the full redirect URL or its raw (still percent-encoded)
    /// query string. The scope set is validated before anything is
    /// persisted; a rejected scope leaves the session awaiting a new
    /// callback and never writes the code to storage.
    pub async fn receive_callback(&self, raw: &str) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;

        if inner.state != AuthState::AwaitingAuthorizationCode {
            return Err(AppError::BadRequest("no login in progress".to_string()));
        }

        let query = raw.rsplit_once('?').map_or(raw, |(_, q)| q);

        if !scopes_granted(query, self.provider.required_scopes()) {
            tracing::warn!("Callback missing required scopes, re-prompting");
            return Err(AppError::ScopeRejected);
        }

        let code = extract_authorization_code(query)
            .ok_or_else(|| AppError::BadRequest("callback carries no code".to_string()))?;

        inner.credential.authorization_code = Some(code.clone());
        inner.state = AuthState::ExchangingCode;
        self.store.save_credential(&inner.credential)?;

        tracing::info!("Exchanging authorization code for tokens");

        match self.provider.exchange_authorization_code(&code).await {
            Ok(grant) => {
                apply_grant(&mut inner.credential, grant);
                inner.state = AuthState::Authenticated;
                self.store.save_credential(&inner.credential)?;
                tracing::info!("Token exchange succeeded");
                Ok(())
            }
            Err(e) => {
                let msg = e.to_string();
                tracing::error!(error = %msg, "Token exchange failed");
                inner.state = AuthState::Failed(FailureReason::Exchange(msg.clone()));
                Err(AppError::ExchangeFailed(msg))
            }
        }
    }

    /// Get an access token that is valid right now.
    ///
    /// Suspends until either a usable token is available or the session
    /// transitions to `Failed`. The expiry check is lazy (performed on each
    /// read, no background timer) and an `Expired -> Refreshing ->
    /// Authenticated` round-trip happens transparently. Because the refresh
    /// runs while the session lock is held, concurrent callers wait on the
    /// lock and then observe the refreshed credential: at most one refresh
    /// call reaches the provider.
    pub async fn get_valid_access_token(&self) -> Result<String, AppError> {
        let mut inner = self.inner.lock().await;

        match inner.state.clone() {
            AuthState::Authenticated => {
                if inner.credential.is_fresh(Utc::now()) {
                    if let Some(token) = &inner.credential.access_token {
                        return Ok(token.clone());
                    }
                }
                inner.state = AuthState::Expired;
            }
            AuthState::Expired | AuthState::Refreshing => {}
            AuthState::Failed(reason) => return Err(reason.to_error()),
            AuthState::Unauthenticated
            | AuthState::AwaitingAuthorizationCode
            | AuthState::ExchangingCode => return Err(AppError::Unauthorized),
        }

        // Expired: refresh under the same lock.
        inner.state = AuthState::Refreshing;

        let Some(refresh_token) = inner.credential.refresh_token.clone() else {
            let msg = "no refresh token on record".to_string();
            inner.state = AuthState::Failed(FailureReason::Refresh(msg.clone()));
            return Err(AppError::RefreshFailed(msg));
        };

        tracing::info!("Access token expired, refreshing");

        match self.provider.refresh_access_token(&refresh_token).await {
            Ok(grant) => {
                apply_grant(&mut inner.credential, grant);
                inner.state = AuthState::Authenticated;
                self.store.save_credential(&inner.credential)?;
                tracing::info!("Token refreshed");

                inner
                    .credential
                    .access_token
                    .clone()
                    .ok_or_else(|| AppError::RefreshFailed("provider returned no token".to_string()))
            }
            Err(e) => {
                let msg = e.to_string();
                tracing::error!(error = %msg, "Token refresh failed");
                inner.state = AuthState::Failed(FailureReason::Refresh(msg.clone()));
                Err(AppError::RefreshFailed(msg))
            }
        }
    }

    /// Current state, with the lazy expiry check applied.
    pub async fn state(&self) -> AuthState {
        let mut inner = self.inner.lock().await;

        if inner.state == AuthState::Authenticated && !inner.credential.is_fresh(Utc::now()) {
            inner.state = AuthState::Expired;
        }

        inner.state.clone()
    }

    /// Drop the credential here and in the store.
    pub async fn logout(&self) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;

        inner.credential.clear();
        inner.state = AuthState::Unauthenticated;
        self.store.clear_credential()?;

        tracing::info!("Logged out, credential cleared");
        Ok(())
    }
}

/// Merge a token grant into the credential.
///
/// A grant without a refresh token keeps the previous one; providers only
/// rotate it on a full exchange.
fn apply_grant(credential: &mut Credential, grant: TokenGrant) {
    credential.access_token = Some(grant.access_token);
    if grant.refresh_token.is_some() {
        credential.refresh_token = grant.refresh_token;
    }
    credential.expires_at = Some(Utc::now() + Duration::seconds(grant.expires_in_secs));
}

/// Check that every required scope was granted.
///
/// The callback query is split on `&` then `=`; the `scope` parameter's
/// value is a `%20`-joined token list. Tokens are percent-decoded before
/// comparison since providers encode the scope URLs themselves.
fn scopes_granted(query: &str, required: &[&'static str]) -> bool {
    let Some(value) = find_param(query, "scope") else {
        return false;
    };

    let granted: Vec<String> = value
        .split("%20")
        .map(|token| {
            urlencoding::decode(token)
                .map(|t| t.into_owned())
                .unwrap_or_else(|_| token.to_string())
        })
        .collect();

    required.iter().all(|r| granted.iter().any(|g| g == r))
}

/// The first `key=value` pair of the callback is the authorization code.
fn extract_authorization_code(query: &str) -> Option<String> {
    let first = query.split('&').next()?;
    let mut kv = first.splitn(2, '=');

    match (kv.next(), kv.next()) {
        (Some("code"), Some(value)) if !value.is_empty() => Some(
            urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string()),
        ),
        _ => None,
    }
}

fn find_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let mut kv = pair.splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some(k), Some(v)) if k == key => Some(v),
            _ => None,
        }
    })
}
