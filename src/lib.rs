//! ride-navigator core
//!
//! Cycling navigation: pick a destination, fetch a bicycling route, track the
//! ride and keep the remaining distance and time fresh.

pub mod config;
pub mod controller;
pub mod coordinate;
pub mod directions;
pub mod error;
pub mod haversine;
pub mod map;
pub mod polyline;
pub mod position;
pub mod refresh;
pub mod route;
pub mod session;
pub mod summary;
pub mod traits;

pub use controller::{RideController, RideEvent};
pub use coordinate::Coordinate;
pub use route::{RouteQueryError, RouteSummary};
