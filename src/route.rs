//! Route summaries returned by directions providers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coordinate::Coordinate;
use crate::polyline::{self, Polyline};

/// The result of a successful directions query.
///
/// Replaced wholesale on every successful refresh; fields are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Overview geometry in the encoded polyline format.
    pub encoded_polyline: String,
    /// Remaining distance as displayed by the provider, e.g. "2.1 km".
    pub remaining_distance_text: String,
    /// Estimated duration as displayed by the provider, e.g. "12 mins".
    pub estimated_duration_text: String,
    /// Remaining distance in meters, when the provider reported it.
    pub remaining_distance_m: Option<f64>,
    /// Estimated duration in seconds, when the provider reported it.
    pub estimated_duration_s: Option<f64>,
}

impl RouteSummary {
    /// Decodes the overview geometry.
    ///
    /// Returns `None` when the encoded string is corrupt.
    pub fn geometry(&self) -> Option<Polyline> {
        polyline::decode(&self.encoded_polyline).ok()
    }
}

/// Why a directions query produced no usable route.
#[derive(Debug, Error)]
pub enum RouteQueryError {
    #[error("directions request failed: {0}")]
    Transport(String),

    #[error("unexpected directions response: {0}")]
    MalformedResponse(String),

    #[error("no route found between {origin} and {destination}")]
    NoRouteFound {
        origin: Coordinate,
        destination: Coordinate,
    },

    #[error("directions request rejected with status {status}: {message}")]
    Rejected { status: String, message: String },
}

impl From<reqwest::Error> for RouteQueryError {
    fn from(err: reqwest::Error) -> Self {
        // Drop the URL so the API key never ends up in logs.
        RouteQueryError::Transport(err.without_url().to_string())
    }
}

/// Formats meters the way the directions service does ("850 m", "2.1 km").
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} m", meters.round() as i64)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

/// Formats seconds the way the directions service does ("1 min", "1 hour 5 mins").
pub fn format_duration(seconds: f64) -> String {
    let total_minutes = ((seconds / 60.0).round() as i64).max(1);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("{} {}", n, unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };

    match (hours, minutes) {
        (0, m) => plural(m, "min"),
        (h, 0) => plural(h, "hour"),
        (h, m) => format!("{} {}", plural(h, "hour"), plural(m, "min")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(849.6), "850 m");
        assert_eq!(format_distance(2100.0), "2.1 km");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(10.0), "1 min");
        assert_eq!(format_duration(720.0), "12 mins");
        assert_eq!(format_duration(3600.0), "1 hour");
        assert_eq!(format_duration(3900.0), "1 hour 5 mins");
        assert_eq!(format_duration(7260.0), "2 hours 1 min");
    }

    #[test]
    fn test_geometry_decodes() {
        let summary = RouteSummary {
            encoded_polyline: "_p~iF~ps|U_ulLnnqC_mqNvxq`@".to_string(),
            remaining_distance_text: "2.1 km".to_string(),
            estimated_duration_text: "12 mins".to_string(),
            remaining_distance_m: None,
            estimated_duration_s: None,
        };
        let geometry = summary.geometry().unwrap();
        assert_eq!(geometry.points().len(), 3);
    }
}
