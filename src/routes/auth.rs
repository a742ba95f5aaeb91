// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth authentication routes.
//!
//! `/auth/callback` is the hosted redirect target the provider sends the
//! user back to; its raw query string is delivered into the session state
//! machine untouched, since the scope list is `%20`-delimited inside an
//! already-encoded parameter.

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::services::{AuthState, FailureReason};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/start", get(auth_start))
        .route("/auth/callback", get(auth_callback))
        .route("/auth/status", get(auth_status))
        .route("/auth/logout", post(logout))
}

/// Start the login flow - redirect to the provider's authorization page.
async fn auth_start(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let authorize_url = state.auth.start_login().await?;

    tracing::info!("Redirecting to provider authorization page");
    Ok(Redirect::temporary(&authorize_url))
}

/// OAuth callback - deliver the code into the session, then bounce to the app.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Redirect> {
    state
        .auth
        .receive_callback(query.as_deref().unwrap_or(""))
        .await?;

    let redirect = format!("{}/?authenticated=true", state.config.frontend_url);
    Ok(Redirect::temporary(&redirect))
}

#[derive(Serialize)]
pub struct AuthStatusResponse {
    pub state: &'static str,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

/// Report where the session is in the credential lifecycle.
async fn auth_status(State(state): State<Arc<AppState>>) -> Json<AuthStatusResponse> {
    let auth_state = state.auth.state().await;

    let failure = match &auth_state {
        AuthState::Failed(FailureReason::Exchange(msg))
        | AuthState::Failed(FailureReason::Refresh(msg)) => Some(msg.clone()),
        _ => None,
    };

    Json(AuthStatusResponse {
        state: auth_state.name(),
        authenticated: auth_state == AuthState::Authenticated,
        failure,
    })
}

/// Logout - clear the credential here and in the store.
async fn logout(State(state): State<Arc<AppState>>) -> Result<StatusCode> {
    state.auth.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}
