// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Static-map URL builder.
//!
//! Produces a MapQuest static-map URL showing the route arc with start,
//! destination and current-position markers. Pure string construction; the
//! image fetch belongs to whoever renders it.

use crate::geo;
use crate::models::{Challenge, Coordinate};

/// Retina-scaled static map of the challenge with the user's position.
pub fn static_map_url(
    api_key: &str,
    challenge: &Challenge,
    position: Coordinate,
    width: u32,
    height: u32,
) -> String {
    let start = format_coordinate(challenge.route.start());
    let end = format_coordinate(challenge.route.end());
    let current = format_coordinate(position);
    let zoom = geo::zoom_level_for_distance(challenge.route.total_distance_km());

    format!(
        "https://www.mapquestapi.com/staticmap/v5/map?key={}\
         &shape={}|{}\
         &locations={}|flag-start-md||{}|flag-end-md||{}|flag-you-sm\
         &size={},{}@2x\
         &zoom={}\
         &routeArc=true",
        api_key, start, end, start, end, current, width, height, zoom
    )
}

fn format_coordinate(c: Coordinate) -> String {
    format!("{},{}", c.latitude, c.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Route;
    use chrono::Utc;

    #[test]
    fn test_map_url_embeds_markers_and_zoom() {
        let start = Coordinate {
            latitude: 51.5074,
            longitude: -0.1278,
        };
        let end = Coordinate {
            latitude: 48.8566,
            longitude: 2.3522,
        };
        let challenge = Challenge {
            route: Route::new(start, end),
            start_date: Utc::now(),
            start_name: "London".to_string(),
            end_name: "Paris".to_string(),
        };
        let position = Coordinate {
            latitude: 50.0,
            longitude: 1.0,
        };

        let url = static_map_url("k3y", &challenge, position, 400, 300);

        assert!(url.contains("key=k3y"));
        assert!(url.contains("51.5074,-0.1278|flag-start-md"));
        assert!(url.contains("48.8566,2.3522|flag-end-md"));
        assert!(url.contains("50,1|flag-you-sm"));
        assert!(url.contains("size=400,300@2x"));
        // London-Paris is ~344 km, the 76..=800 band
        assert!(url.contains("zoom=5"));
        assert!(url.contains("routeArc=true"));
    }
}
