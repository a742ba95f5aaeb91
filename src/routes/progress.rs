// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progress routes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::map;
use crate::models::ProgressState;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/progress/refresh", post(refresh_progress))
        .route("/progress", get(get_progress))
        .route("/progress/map", get(get_progress_map))
}

/// Recompute progress from the provider's activity data.
///
/// Errors keep the previous snapshot: authentication failures come back as
/// blocking 401/403s, a provider outage as a retryable 503.
async fn refresh_progress(State(state): State<Arc<AppState>>) -> Result<Json<ProgressState>> {
    let challenge = state
        .prefs
        .load_challenge()?
        .ok_or(AppError::ChallengeNotConfigured)?;

    let progress = state
        .engine
        .refresh_progress(&challenge, Utc::now())
        .await?;

    Ok(Json(progress))
}

/// Last published snapshot, without contacting the provider.
async fn get_progress(State(state): State<Arc<AppState>>) -> Result<Json<ProgressState>> {
    state
        .engine
        .snapshot()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("no progress computed yet".to_string()))
}

#[derive(Serialize)]
pub struct ProgressMapResponse {
    pub url: String,
}

/// Static-map URL for the current position along the route.
async fn get_progress_map(State(state): State<Arc<AppState>>) -> Result<Json<ProgressMapResponse>> {
    let challenge = state
        .prefs
        .load_challenge()?
        .ok_or(AppError::ChallengeNotConfigured)?;

    // Before the first refresh the marker sits at the start line.
    let position = state
        .engine
        .snapshot()
        .map_or(challenge.route.start(), |p| p.current_position);

    let url = map::static_map_url(&state.config.map_api_key, &challenge, position, 600, 400);

    Ok(Json(ProgressMapResponse { url }))
}
