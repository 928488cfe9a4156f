//! When to re-query the directions service during a ride.

use std::time::{Duration, Instant};

use crate::coordinate::Coordinate;

/// Throttle for route refreshes.
///
/// A refresh is due when nothing has been issued yet, or when both at least
/// `min_interval` has elapsed and the rider has moved at least
/// `min_distance_m` since the last issued query. The default refreshes on
/// every position update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RefreshPolicy {
    pub min_interval: Duration,
    pub min_distance_m: f64,
}

/// Where and when the last route query was issued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IssuedQuery {
    pub at: Instant,
    pub origin: Coordinate,
}

impl RefreshPolicy {
    pub fn new(min_interval: Duration, min_distance_m: f64) -> Self {
        Self {
            min_interval,
            min_distance_m,
        }
    }

    pub fn is_due(&self, last: Option<&IssuedQuery>, now: Instant, position: Coordinate) -> bool {
        let Some(last) = last else {
            return true;
        };

        let elapsed = now.saturating_duration_since(last.at);
        elapsed >= self.min_interval && last.origin.distance_to(&position) >= self.min_distance_m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issued(at: Instant) -> IssuedQuery {
        IssuedQuery {
            at,
            origin: Coordinate::new(37.7858, -122.4064),
        }
    }

    #[test]
    fn test_default_always_due() {
        let now = Instant::now();
        let last = issued(now);
        assert!(RefreshPolicy::default().is_due(Some(&last), now, last.origin));
    }

    #[test]
    fn test_first_query_always_due() {
        let policy = RefreshPolicy::new(Duration::from_secs(60), 500.0);
        assert!(policy.is_due(None, Instant::now(), Coordinate::new(0.0, 0.0)));
    }

    #[test]
    fn test_interval_throttles() {
        let policy = RefreshPolicy::new(Duration::from_secs(10), 0.0);
        let start = Instant::now();
        let last = issued(start);
        assert!(!policy.is_due(Some(&last), start + Duration::from_secs(5), last.origin));
        assert!(policy.is_due(Some(&last), start + Duration::from_secs(10), last.origin));
    }

    #[test]
    fn test_distance_throttles() {
        let policy = RefreshPolicy::new(Duration::ZERO, 50.0);
        let now = Instant::now();
        let last = issued(now);
        // ~11 m north
        let near = Coordinate::new(37.7859, -122.4064);
        // ~111 m north
        let far = Coordinate::new(37.7868, -122.4064);
        assert!(!policy.is_due(Some(&last), now, near));
        assert!(policy.is_due(Some(&last), now, far));
    }
}
