// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key names for everything persisted in the preferences store.
//!
//! All values are simple scalars (string, bool, float, RFC3339 timestamp).

/// Account / credential keys. Written only by the auth session.
pub mod account {
    /// Bool: set once the user has completed a login
    pub const AUTHENTICATED: &str = "account.authenticated";
    /// String: one-shot code captured from the OAuth callback
    pub const AUTHORIZATION_CODE: &str = "account.authorization_code";
    /// String
    pub const ACCESS_TOKEN: &str = "account.access_token";
    /// String
    pub const REFRESH_TOKEN: &str = "account.refresh_token";
    /// RFC3339 timestamp: when the access token expires
    pub const TOKEN_EXPIRY: &str = "account.token_expiry";
}

/// Challenge configuration keys.
pub mod challenge {
    /// RFC3339 timestamp: activity before this does not count
    pub const START_DATE: &str = "challenge.start_date";
    pub const START_NAME: &str = "challenge.start_name";
    pub const START_LATITUDE: &str = "challenge.start_latitude";
    pub const START_LONGITUDE: &str = "challenge.start_longitude";
    pub const END_NAME: &str = "challenge.end_name";
    pub const END_LATITUDE: &str = "challenge.end_latitude";
    pub const END_LONGITUDE: &str = "challenge.end_longitude";
    /// Float: route length in km, derived from the endpoints
    pub const TOTAL_DISTANCE_KM: &str = "challenge.total_distance_km";
    /// Bool: challenge setup finished
    pub const SETUP_COMPLETE: &str = "challenge.setup_complete";
}

/// Last published progress values, mirrored for cold starts.
pub mod progress {
    pub const DISTANCE_COVERED_KM: &str = "progress.distance_covered_km";
    pub const PERCENT_COMPLETE: &str = "progress.percent_complete";
    pub const CURRENT_LATITUDE: &str = "progress.current_latitude";
    pub const CURRENT_LONGITUDE: &str = "progress.current_longitude";
}
