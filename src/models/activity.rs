//! Provider activity data.

use chrono::{DateTime, Utc};

/// Step total for one calendar-day bucket returned by the provider.
///
/// Consumed immediately by the progress engine; not retained beyond a single
/// aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivitySample {
    pub day_start: DateTime<Utc>,
    pub step_count: u64,
}
