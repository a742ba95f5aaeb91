// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable key/value preferences store.
//!
//! A thin string-keyed backend trait with two implementations (in-memory and
//! JSON file), wrapped by [`PrefsStore`], which adds typed accessors and the
//! domain-level load/save operations the services use.

pub mod file;
pub mod keys;
pub mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::{Challenge, Coordinate, Credential, ProgressState, Route};
use crate::time_utils::{format_utc_rfc3339, parse_utc_rfc3339};

/// String-keyed storage backend.
///
/// Implementations must be safe for concurrent use; callers provide any
/// higher-level read-modify-write atomicity themselves.
pub trait KeyValueBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn delete(&self, key: &str) -> Result<(), AppError>;
}

/// Typed wrapper over a [`KeyValueBackend`].
#[derive(Clone)]
pub struct PrefsStore {
    backend: Arc<dyn KeyValueBackend>,
}

impl PrefsStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    /// In-memory store for tests and ephemeral runs.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::default()))
    }

    // ─── Typed accessors ─────────────────────────────────────────

    pub fn get_string(&self, key: &str) -> Result<Option<String>, AppError> {
        self.backend.get(key)
    }

    pub fn set_string(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.backend.set(key, value)
    }

    pub fn delete(&self, key: &str) -> Result<(), AppError> {
        self.backend.delete(key)
    }

    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, AppError> {
        Ok(self.backend.get(key)?.and_then(|v| v.parse().ok()))
    }

    pub fn set_f64(&self, key: &str, value: f64) -> Result<(), AppError> {
        self.backend.set(key, &value.to_string())
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, AppError> {
        Ok(self
            .backend
            .get(key)?
            .is_some_and(|v| v == "true"))
    }

    pub fn set_bool(&self, key: &str, value: bool) -> Result<(), AppError> {
        self.backend.set(key, if value { "true" } else { "false" })
    }

    pub fn get_datetime(&self, key: &str) -> Result<Option<DateTime<Utc>>, AppError> {
        Ok(self
            .backend
            .get(key)?
            .as_deref()
            .and_then(parse_utc_rfc3339))
    }

    pub fn set_datetime(&self, key: &str, value: DateTime<Utc>) -> Result<(), AppError> {
        self.backend.set(key, &format_utc_rfc3339(value))
    }

    // ─── Credential ──────────────────────────────────────────────

    /// Load whatever credential material has been persisted.
    ///
    /// A missing expiry is returned as `None`; the auth session decides how
    /// much to trust a token of unknown age.
    pub fn load_credential(&self) -> Result<Credential, AppError> {
        Ok(Credential {
            authorization_code: self.get_string(keys::account::AUTHORIZATION_CODE)?,
            access_token: self.get_string(keys::account::ACCESS_TOKEN)?,
            refresh_token: self.get_string(keys::account::REFRESH_TOKEN)?,
            expires_at: self.get_datetime(keys::account::TOKEN_EXPIRY)?,
        })
    }

    pub fn save_credential(&self, credential: &Credential) -> Result<(), AppError> {
        match &credential.authorization_code {
            Some(code) => self.set_string(keys::account::AUTHORIZATION_CODE, code)?,
            None => self.delete(keys::account::AUTHORIZATION_CODE)?,
        }
        match &credential.access_token {
            Some(token) => self.set_string(keys::account::ACCESS_TOKEN, token)?,
            None => self.delete(keys::account::ACCESS_TOKEN)?,
        }
        match &credential.refresh_token {
            Some(token) => self.set_string(keys::account::REFRESH_TOKEN, token)?,
            None => self.delete(keys::account::REFRESH_TOKEN)?,
        }
        match credential.expires_at {
            Some(expires_at) => self.set_datetime(keys::account::TOKEN_EXPIRY, expires_at)?,
            None => self.delete(keys::account::TOKEN_EXPIRY)?,
        }
        self.set_bool(
            keys::account::AUTHENTICATED,
            credential.access_token.is_some(),
        )
    }

    pub fn clear_credential(&self) -> Result<(), AppError> {
        self.delete(keys::account::AUTHORIZATION_CODE)?;
        self.delete(keys::account::ACCESS_TOKEN)?;
        self.delete(keys::account::REFRESH_TOKEN)?;
        self.delete(keys::account::TOKEN_EXPIRY)?;
        self.set_bool(keys::account::AUTHENTICATED, false)
    }

    // ─── Challenge ───────────────────────────────────────────────

    /// Load the configured challenge, or `None` if setup never finished.
    ///
    /// The route distance is rederived from the endpoints rather than read
    /// back, which keeps the cached value honest.
    pub fn load_challenge(&self) -> Result<Option<Challenge>, AppError> {
        if !self.get_bool(keys::challenge::SETUP_COMPLETE)? {
            return Ok(None);
        }

        let (Some(start_lat), Some(start_lon), Some(end_lat), Some(end_lon), Some(start_date)) = (
            self.get_f64(keys::challenge::START_LATITUDE)?,
            self.get_f64(keys::challenge::START_LONGITUDE)?,
            self.get_f64(keys::challenge::END_LATITUDE)?,
            self.get_f64(keys::challenge::END_LONGITUDE)?,
            self.get_datetime(keys::challenge::START_DATE)?,
        ) else {
            return Ok(None);
        };

        let route = Route::new(
            Coordinate {
                latitude: start_lat,
                longitude: start_lon,
            },
            Coordinate {
                latitude: end_lat,
                longitude: end_lon,
            },
        );

        Ok(Some(Challenge {
            route,
            start_date,
            start_name: self
                .get_string(keys::challenge::START_NAME)?
                .unwrap_or_default(),
            end_name: self
                .get_string(keys::challenge::END_NAME)?
                .unwrap_or_default(),
        }))
    }

    pub fn save_challenge(&self, challenge: &Challenge) -> Result<(), AppError> {
        let start = challenge.route.start();
        let end = challenge.route.end();

        self.set_f64(keys::challenge::START_LATITUDE, start.latitude)?;
        self.set_f64(keys::challenge::START_LONGITUDE, start.longitude)?;
        self.set_f64(keys::challenge::END_LATITUDE, end.latitude)?;
        self.set_f64(keys::challenge::END_LONGITUDE, end.longitude)?;
        self.set_string(keys::challenge::START_NAME, &challenge.start_name)?;
        self.set_string(keys::challenge::END_NAME, &challenge.end_name)?;
        self.set_datetime(keys::challenge::START_DATE, challenge.start_date)?;
        self.set_f64(
            keys::challenge::TOTAL_DISTANCE_KM,
            challenge.route.total_distance_km(),
        )?;
        self.set_bool(keys::challenge::SETUP_COMPLETE, true)
    }

    // ─── Progress mirror ─────────────────────────────────────────

    pub fn save_progress(&self, progress: &ProgressState) -> Result<(), AppError> {
        self.set_f64(
            keys::progress::DISTANCE_COVERED_KM,
            progress.distance_covered_km,
        )?;
        self.set_f64(keys::progress::PERCENT_COMPLETE, progress.percent_complete)?;
        self.set_f64(
            keys::progress::CURRENT_LATITUDE,
            progress.current_position.latitude,
        )?;
        self.set_f64(
            keys::progress::CURRENT_LONGITUDE,
            progress.current_position.longitude,
        )
    }

    pub fn load_progress(&self) -> Result<Option<ProgressState>, AppError> {
        let (Some(distance), Some(percent), Some(lat), Some(lon)) = (
            self.get_f64(keys::progress::DISTANCE_COVERED_KM)?,
            self.get_f64(keys::progress::PERCENT_COMPLETE)?,
            self.get_f64(keys::progress::CURRENT_LATITUDE)?,
            self.get_f64(keys::progress::CURRENT_LONGITUDE)?,
        ) else {
            return Ok(None);
        };

        Ok(Some(ProgressState {
            distance_covered_km: distance,
            percent_complete: percent,
            current_position: Coordinate {
                latitude: lat,
                longitude: lon,
            },
        }))
    }
}
