// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route and challenge models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::{self, Unit};

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A great-circle route between two locations.
///
/// `total_distance_km` is derived from the endpoints and cached; the only
/// ways to change an endpoint go through [`Route::set_start`] /
/// [`Route::set_end`], which recompute it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Route {
    start: Coordinate,
    end: Coordinate,
    total_distance_km: f64,
}

impl Route {
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self {
            start,
            end,
            total_distance_km: geo::distance(start, end, Unit::Kilometers),
        }
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }

    pub fn end(&self) -> Coordinate {
        self.end
    }

    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    pub fn set_start(&mut self, start: Coordinate) {
        self.start = start;
        self.total_distance_km = geo::distance(self.start, self.end, Unit::Kilometers);
    }

    pub fn set_end(&mut self, end: Coordinate) {
        self.end = end;
        self.total_distance_km = geo::distance(self.start, self.end, Unit::Kilometers);
    }
}

/// The configured step challenge: a route plus the date progress counts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub route: Route,
    /// Activity before this instant does not count toward progress.
    pub start_date: DateTime<Utc>,
    /// Display name of the start location
    pub start_name: String,
    /// Display name of the destination
    pub end_name: String,
}
