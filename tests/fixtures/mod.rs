//! Test fixtures for ride-navigator.
//!
//! Provides:
//! - San Francisco coordinates used across the ride tests
//! - Canned directions responses
//! - A scripted route provider

pub mod sf_locations;

pub use sf_locations::*;

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use ride_navigator::controller::RideController;
use ride_navigator::coordinate::Coordinate;
use ride_navigator::directions::parse_response;
use ride_navigator::route::{RouteQueryError, RouteSummary};
use ride_navigator::traits::RouteProvider;

/// Answers every query by parsing whatever response body is currently set.
pub struct ScriptedProvider {
    body: Mutex<String>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(body: &str) -> Self {
        Self {
            body: Mutex::new(body.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn respond_with(&self, body: &str) {
        *self.body.lock().unwrap() = body.to_string();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RouteProvider for ScriptedProvider {
    fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteSummary, RouteQueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = self.body.lock().unwrap().clone();
        parse_response(&body, origin, destination)
    }
}

/// Handles mailbox events until the outstanding route query has resolved.
pub fn settle<P: RouteProvider + 'static>(controller: &mut RideController<P>) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while controller.outstanding_query().is_some() && Instant::now() < deadline {
        controller.wait_for_event(Duration::from_millis(50));
    }
    assert!(
        controller.outstanding_query().is_none(),
        "route query never resolved"
    );
}

/// A point `meters` due north of `from`.
pub fn north_of(from: Coordinate, meters: f64) -> Coordinate {
    let delta_lat = (meters / 6_371_000.0).to_degrees();
    Coordinate::new(from.lat + delta_lat, from.lng)
}
