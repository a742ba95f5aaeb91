// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod progress;

pub use auth::{AuthSession, AuthState, FailureReason};
pub use progress::ProgressEngine;
