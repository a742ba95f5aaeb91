// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route-progress engine.
//!
//! Handles the core workflow:
//! 1. Obtain a valid access token from the auth session
//! 2. Fetch per-day step totals from the provider
//! 3. Convert steps to simulated distance along the route
//! 4. Publish an immutable progress snapshot and mirror it to the store

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::geo;
use crate::models::{Challenge, ProgressState, Route};
use crate::provider::ProviderGateway;
use crate::services::AuthSession;
use crate::store::PrefsStore;

/// Converts activity samples into progress along the configured route.
pub struct ProgressEngine {
    auth: Arc<AuthSession>,
    provider: Arc<dyn ProviderGateway>,
    store: PrefsStore,
    /// Steps-to-distance ratio (steps per kilometre), fixed per install
    steps_per_km: f64,
    /// Last good snapshot; swapped whole, never mutated in place
    snapshot: RwLock<Option<ProgressState>>,
}

impl ProgressEngine {
    /// Create the engine, rehydrating the last published snapshot from the
    /// store so UI readers have something before the first refresh.
    pub fn new(
        auth: Arc<AuthSession>,
        provider: Arc<dyn ProviderGateway>,
        store: PrefsStore,
        steps_per_km: f64,
    ) -> Result<Self, AppError> {
        let snapshot = store.load_progress()?;

        Ok(Self {
            auth,
            provider,
            store,
            steps_per_km,
            snapshot: RwLock::new(snapshot),
        })
    }

    /// Recompute progress from challenge start through `as_of`.
    ///
    /// An authentication failure surfaces unchanged; a provider fetch
    /// failure surfaces as `DataUnavailable`. Either way the previous
    /// snapshot stays in place (no partial update) and retrying is the
    /// caller's decision.
    pub async fn refresh_progress(
        &self,
        challenge: &Challenge,
        as_of: DateTime<Utc>,
    ) -> Result<ProgressState, AppError> {
        let access_token = self.auth.get_valid_access_token().await?;

        let samples = self
            .provider
            .fetch_daily_activity(&access_token, challenge.start_date, as_of)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Activity fetch failed, keeping previous snapshot");
                AppError::DataUnavailable(e.to_string())
            })?;

        let total_steps: u64 = samples.iter().map(|s| s.step_count).sum();

        let state = compute_progress(&challenge.route, total_steps, self.steps_per_km);

        tracing::info!(
            total_steps,
            distance_covered_km = state.distance_covered_km,
            percent_complete = state.percent_complete,
            "Progress recomputed"
        );

        self.store.save_progress(&state)?;
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(state);

        Ok(state)
    }

    /// Last good snapshot, if any refresh has ever succeeded.
    pub fn snapshot(&self) -> Option<ProgressState> {
        *self
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Pure conversion from a cumulative step count to route progress.
///
/// Distance never exceeds the route length: finishing early pins the
/// position to the destination. A degenerate zero-length route counts as
/// already complete rather than dividing by zero.
pub fn compute_progress(route: &Route, total_steps: u64, steps_per_km: f64) -> ProgressState {
    let total_km = route.total_distance_km();
    let raw_km = total_steps as f64 / steps_per_km;

    let (distance_covered_km, percent_complete) = if total_km > 0.0 {
        let covered = raw_km.min(total_km);
        (covered, (covered / total_km * 100.0).min(100.0))
    } else {
        (0.0, 100.0)
    };

    ProgressState {
        distance_covered_km,
        percent_complete,
        current_position: geo::interpolate(route.start(), route.end(), percent_complete),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;

    fn route_of_length(target_km: f64) -> Route {
        // One degree of longitude on the equator is ~111.3 km under the
        // legacy formula; scale to hit the requested length exactly.
        let start = Coordinate {
            latitude: 0.0,
            longitude: 0.0,
        };
        let probe = Route::new(
            start,
            Coordinate {
                latitude: 0.0,
                longitude: 1.0,
            },
        );
        let degrees = target_km / probe.total_distance_km();

        Route::new(
            start,
            Coordinate {
                latitude: 0.0,
                longitude: degrees,
            },
        )
    }

    #[test]
    fn test_halfway_progress() {
        let route = route_of_length(500.0);
        // 250 km at 1000 steps/km
        let state = compute_progress(&route, 250_000, 1000.0);

        assert!((state.distance_covered_km - 250.0).abs() < 1e-6);
        assert!((state.percent_complete - 50.0).abs() < 1e-6);
        assert_eq!(
            state.current_position,
            geo::interpolate(route.start(), route.end(), state.percent_complete)
        );
    }

    #[test]
    fn test_overshoot_clamps_to_route_length() {
        let route = route_of_length(500.0);
        // 600 km worth of steps on a 500 km route
        let state = compute_progress(&route, 600_000, 1000.0);

        assert!((state.distance_covered_km - route.total_distance_km()).abs() < 1e-9);
        assert_eq!(state.percent_complete, 100.0);
        assert_eq!(state.current_position, route.end());
    }

    #[test]
    fn test_no_steps_stays_at_start() {
        let route = route_of_length(500.0);
        let state = compute_progress(&route, 0, 1000.0);

        assert_eq!(state.distance_covered_km, 0.0);
        assert_eq!(state.percent_complete, 0.0);
        assert_eq!(state.current_position, route.start());
    }

    #[test]
    fn test_zero_length_route_is_complete() {
        let here = Coordinate {
            latitude: 51.5,
            longitude: -0.1,
        };
        let route = Route::new(here, here);
        let state = compute_progress(&route, 1234, 1000.0);

        assert_eq!(state.percent_complete, 100.0);
        assert_eq!(state.current_position, here);
    }
}
