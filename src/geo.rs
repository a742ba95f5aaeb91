// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Great-circle math for route challenges.
//!
//! The distance formula is the spherical law of cosines with empirical
//! unit constants (1.1515 minutes-of-arc miles, 1.609344 km/mile, 0.8684
//! nautical), not haversine. Zoom thresholds and percent-complete values
//! were tuned against this exact approximation, so it must not be swapped
//! for a more accurate geodesic.

use crate::models::Coordinate;

/// Output unit for [`distance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Kilometers,
    Miles,
    NauticalMiles,
}

/// Great-circle distance between two coordinates.
///
/// Spherical law of cosines:
/// `d = acos(sin(lat1)*sin(lat2) + cos(lat1)*cos(lat2)*cos(dlon))`,
/// converted to minutes of arc (`* 180/pi * 60`) and statute miles
/// (`* 1.1515`), then to the requested unit.
pub fn distance(a: Coordinate, b: Coordinate, unit: Unit) -> f64 {
    let rlat1 = a.latitude.to_radians();
    let rlat2 = b.latitude.to_radians();
    let rtheta = (a.longitude - b.longitude).to_radians();

    // Floating-point drift can push the cosine sum past 1.0 for identical
    // points, which would make acos return NaN.
    let cos_d = (rlat1.sin() * rlat2.sin() + rlat1.cos() * rlat2.cos() * rtheta.cos())
        .clamp(-1.0, 1.0);

    let miles = cos_d.acos().to_degrees() * 60.0 * 1.1515;

    match unit {
        Unit::Kilometers => miles * 1.609344,
        Unit::NauticalMiles => miles * 0.8684,
        Unit::Miles => miles,
    }
}

/// Point a given percentage of the way from `a` to `b`.
///
/// Latitude and longitude are interpolated independently. This is a planar
/// approximation rather than a geodesic slerp; the fraction always comes
/// from [`distance`], which keeps the on-map position visually consistent.
pub fn interpolate(a: Coordinate, b: Coordinate, fraction_percent: f64) -> Coordinate {
    let f = fraction_percent / 100.0;

    Coordinate {
        latitude: a.latitude + (b.latitude - a.latitude) * f,
        longitude: a.longitude + (b.longitude - a.longitude) * f,
    }
}

/// Static-map zoom level for a route of the given length.
///
/// Band boundaries are inclusive on the lower side: exactly 800 km still
/// maps to zoom 5.
pub fn zoom_level_for_distance(km: f64) -> u8 {
    if km <= 75.0 {
        6
    } else if km <= 800.0 {
        5
    } else if km <= 2000.0 {
        4
    } else if km <= 4500.0 {
        3
    } else if km <= 8000.0 {
        2
    } else {
        1
    }
}
