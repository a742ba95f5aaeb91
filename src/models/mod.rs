// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod credential;
pub mod progress;
pub mod route;

pub use activity::ActivitySample;
pub use credential::Credential;
pub use progress::ProgressState;
pub use route::{Challenge, Coordinate, Route};
