//! Haversine distance and a straight-line route provider (fallback when the
//! directions service is unavailable).
//!
//! The straight-line provider ignores roads entirely. It is only useful for
//! offline replays and for keeping the summary populated without a key.

use crate::coordinate::Coordinate;
use crate::polyline;
use crate::route::{self, RouteQueryError, RouteSummary};
use crate::traits::RouteProvider;

/// Average cycling speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 15.0;

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters.
pub fn haversine_m(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Straight-line route provider.
///
/// Reports the great-circle distance and a duration at an assumed speed.
#[derive(Debug, Clone)]
pub struct StraightLineRoute {
    /// Assumed average cycling speed in km/h.
    pub speed_kmh: f64,
}

impl Default for StraightLineRoute {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl StraightLineRoute {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Convert distance in meters to travel time in seconds.
    fn meters_to_seconds(&self, meters: f64) -> f64 {
        let hours = meters / 1000.0 / self.speed_kmh;
        (hours * 3600.0).round()
    }
}

impl RouteProvider for StraightLineRoute {
    fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteSummary, RouteQueryError> {
        if self.speed_kmh.is_nan() || self.speed_kmh <= 0.0 {
            return Err(RouteQueryError::NoRouteFound {
                origin,
                destination,
            });
        }

        let meters = haversine_m(origin, destination);
        let seconds = self.meters_to_seconds(meters);

        Ok(RouteSummary {
            encoded_polyline: polyline::encode(&[origin, destination]),
            remaining_distance_text: route::format_distance(meters),
            estimated_duration_text: route::format_duration(seconds),
            remaining_distance_m: Some(meters),
            estimated_duration_s: Some(seconds),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let p = Coordinate::new(37.7858, -122.4064);
        assert!(haversine_m(p, p) < 0.001, "Same point should have ~0 distance");
    }

    #[test]
    fn test_haversine_known_distance() {
        // Union Square to Civic Center, San Francisco: ~1.6 km as the crow flies.
        let dist = haversine_m(
            Coordinate::new(37.7858, -122.4064),
            Coordinate::new(37.7749, -122.4194),
        );
        assert!(dist > 1500.0 && dist < 1800.0, "got {}", dist);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = Coordinate::new(36.1, -115.1);
        let b = Coordinate::new(36.2, -115.2);
        assert_eq!(haversine_m(a, b), haversine_m(b, a));
    }

    #[test]
    fn test_reasonable_travel_time() {
        let provider = StraightLineRoute::new(15.0);
        // 5 km at 15 km/h = 20 minutes
        assert_eq!(provider.meters_to_seconds(5000.0), 1200.0);
    }

    #[test]
    fn test_straight_line_summary() {
        let provider = StraightLineRoute::default();
        let origin = Coordinate::new(37.7858, -122.4064);
        let destination = Coordinate::new(37.7749, -122.4194);
        let summary = provider.fetch_route(origin, destination).unwrap();

        assert!(summary.remaining_distance_text.ends_with(" km"));
        assert!(summary.estimated_duration_text.ends_with("mins"));
        assert_eq!(summary.geometry().unwrap().len(), 2);
    }

    #[test]
    fn test_zero_speed_has_no_route() {
        let provider = StraightLineRoute::new(0.0);
        let result = provider.fetch_route(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert!(matches!(result, Err(RouteQueryError::NoRouteFound { .. })));
    }
}
