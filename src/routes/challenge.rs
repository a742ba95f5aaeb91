// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Challenge setup routes.

use axum::{extract::State, routing::put, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::geo;
use crate::models::{Challenge, Coordinate, Route};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/challenge", put(set_challenge).get(get_challenge))
}

#[derive(Deserialize)]
pub struct ChallengeRequest {
    pub start: Coordinate,
    pub end: Coordinate,
    pub start_name: String,
    pub end_name: String,
    /// Defaults to now: progress counts from the moment of setup.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct ChallengeResponse {
    pub start: Coordinate,
    pub end: Coordinate,
    pub start_name: String,
    pub end_name: String,
    pub start_date: DateTime<Utc>,
    pub total_distance_km: f64,
    pub zoom_level: u8,
}

impl From<Challenge> for ChallengeResponse {
    fn from(challenge: Challenge) -> Self {
        Self {
            start: challenge.route.start(),
            end: challenge.route.end(),
            start_name: challenge.start_name,
            end_name: challenge.end_name,
            start_date: challenge.start_date,
            total_distance_km: challenge.route.total_distance_km(),
            zoom_level: geo::zoom_level_for_distance(challenge.route.total_distance_km()),
        }
    }
}

/// Configure (or reconfigure) the challenge route.
async fn set_challenge(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChallengeRequest>,
) -> Result<Json<ChallengeResponse>> {
    validate_coordinate(request.start)?;
    validate_coordinate(request.end)?;

    let challenge = Challenge {
        route: Route::new(request.start, request.end),
        start_date: request.start_date.unwrap_or_else(Utc::now),
        start_name: request.start_name,
        end_name: request.end_name,
    };

    state.prefs.save_challenge(&challenge)?;

    tracing::info!(
        start = %challenge.start_name,
        end = %challenge.end_name,
        total_distance_km = challenge.route.total_distance_km(),
        "Challenge configured"
    );

    Ok(Json(challenge.into()))
}

/// Read the configured challenge.
async fn get_challenge(State(state): State<Arc<AppState>>) -> Result<Json<ChallengeResponse>> {
    let challenge = state
        .prefs
        .load_challenge()?
        .ok_or(AppError::ChallengeNotConfigured)?;

    Ok(Json(challenge.into()))
}

fn validate_coordinate(c: Coordinate) -> Result<()> {
    if !(-90.0..=90.0).contains(&c.latitude) || !(-180.0..=180.0).contains(&c.longitude) {
        return Err(AppError::BadRequest(format!(
            "coordinate out of range: {},{}",
            c.latitude, c.longitude
        )));
    }
    Ok(())
}
