// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Stepquest: turn daily step counts into progress along a real-world route
//!
//! This crate provides the backend core for a step-challenge app: an OAuth2
//! session against a fitness-data provider, and an engine that converts the
//! user's daily step totals into a simulated position along a great-circle
//! route between two locations.

pub mod config;
pub mod error;
pub mod geo;
pub mod map;
pub mod models;
pub mod provider;
pub mod routes;
pub mod services;
pub mod store;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use services::{AuthSession, ProgressEngine};
use store::PrefsStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub prefs: PrefsStore,
    pub auth: Arc<AuthSession>,
    pub engine: Arc<ProgressEngine>,
}
