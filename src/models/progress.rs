//! Derived route-progress state.

use serde::{Deserialize, Serialize};

use crate::models::Coordinate;

/// Snapshot of progress along the configured route.
///
/// Recomputed whenever new activity data or a new route is available; UI
/// consumers only ever read an immutable snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    pub distance_covered_km: f64,
    /// 0–100, clamped
    pub percent_complete: f64,
    pub current_position: Coordinate,
}
