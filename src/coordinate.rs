//! Geographic coordinate value type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        crate::haversine::haversine_m(*self, *other)
    }

    /// Formats as the `lat,lng` pair the directions endpoint expects.
    pub fn to_query_param(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate `{0}`, expected `lat,lng`")]
pub struct ParseCoordinateError(pub String);

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordinateError(s.to_string());
        let (lat, lng) = s.trim().split_once(',').ok_or_else(err)?;
        let lat: f64 = lat.trim().parse().map_err(|_| err())?;
        let lng: f64 = lng.trim().parse().map_err(|_| err())?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(err());
        }
        Ok(Self { lat, lng })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        let coord: Coordinate = "37.7858, -122.4064".parse().unwrap();
        assert_eq!(coord, Coordinate::new(37.7858, -122.4064));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("37.7858".parse::<Coordinate>().is_err());
        assert!("abc,def".parse::<Coordinate>().is_err());
        assert!("95.0,10.0".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_query_param_keeps_precision() {
        let coord = Coordinate::new(37.7749, -122.4194);
        assert_eq!(coord.to_query_param(), "37.7749,-122.4194");
    }
}
