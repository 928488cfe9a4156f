//! Ride session state owned by the controller.

use serde::Serialize;

use crate::coordinate::Coordinate;
use crate::polyline::Polyline;
use crate::route::RouteSummary;

/// Whether a ride is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RideState {
    Idle,
    Active,
}

/// The positions actually recorded during a ride.
///
/// Append-only between resets. The total length is maintained incrementally:
/// each append adds only the segment to its predecessor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraveledPath {
    points: Vec<Coordinate>,
    length_m: f64,
}

impl TraveledPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: Coordinate) {
        if let Some(last) = self.points.last() {
            self.length_m += last.distance_to(&point);
        }
        self.points.push(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.length_m = 0.0;
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn last(&self) -> Option<Coordinate> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total traveled distance in meters.
    pub fn length_m(&self) -> f64 {
        self.length_m
    }

    pub fn to_polyline(&self) -> Polyline {
        Polyline::new(self.points.clone())
    }
}

/// Aggregate navigation state.
///
/// `is_active` implies `destination.is_some()`.
#[derive(Debug, Clone, Default)]
pub struct RideSession {
    pub(crate) destination: Option<Coordinate>,
    pub(crate) planned_route: Option<RouteSummary>,
    pub(crate) traveled_path: TraveledPath,
    pub(crate) is_active: bool,
}

impl RideSession {
    pub fn destination(&self) -> Option<Coordinate> {
        self.destination
    }

    pub fn planned_route(&self) -> Option<&RouteSummary> {
        self.planned_route.as_ref()
    }

    pub fn traveled_path(&self) -> &TraveledPath {
        &self.traveled_path
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn state(&self) -> RideState {
        if self.is_active {
            RideState::Active
        } else {
            RideState::Idle
        }
    }

    /// Drops everything back to the initial idle state.
    pub(crate) fn reset(&mut self) {
        self.destination = None;
        self.planned_route = None;
        self.traveled_path.clear();
        self.is_active = false;
    }
}
