//! Seams between the ride controller and its external collaborators.
//!
//! The directions service, the device location provider and the map
//! renderer are all owned by someone else. The controller only sees them
//! through these traits.

use crate::coordinate::Coordinate;
use crate::map::MapProjection;
use crate::position::{PositionError, PositionFix};
use crate::route::{RouteQueryError, RouteSummary};

/// Computes a bicycling route between two coordinates.
///
/// Implementations are called from background workers, so they must be
/// shareable across threads. Every failure is returned as a value.
pub trait RouteProvider: Send + Sync {
    fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteSummary, RouteQueryError>;
}

impl<P: RouteProvider + ?Sized> RouteProvider for std::sync::Arc<P> {
    fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteSummary, RouteQueryError> {
        (**self).fetch_route(origin, destination)
    }
}

/// Delivers position fixes as the device moves.
///
/// A source is a non-restartable sequence: `Ok(None)` means it is exhausted.
/// Fixes are delivered with non-decreasing timestamps.
pub trait PositionSource {
    fn next_fix(&mut self) -> Result<Option<PositionFix>, PositionError>;
}

/// Renders the controller's published state.
pub trait MapSurface {
    fn render(&mut self, projection: &MapProjection);
}

impl<P: RouteProvider + ?Sized> RouteProvider for Box<P> {
    fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteSummary, RouteQueryError> {
        (**self).fetch_route(origin, destination)
    }
}
