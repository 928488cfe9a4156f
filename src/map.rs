//! What the map surface draws, as published by the controller.

use crate::coordinate::Coordinate;
use crate::polyline::Polyline;

/// Read-only view of the ride for the map renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapProjection {
    pub destination_marker: Option<Coordinate>,
    /// Decoded planned route, absent until the first route query succeeds.
    pub planned_route: Option<Polyline>,
    pub traveled_path: Polyline,
    /// Where the camera should follow, the last known position.
    pub camera: Option<Coordinate>,
    /// Taps choose a destination only while this is set.
    pub taps_enabled: bool,
}
