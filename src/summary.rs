//! Status label text shown under the map.

use std::fmt;

use crate::route::RouteSummary;

/// Meters to statute miles, as used for the traveled distance readout.
pub const METERS_TO_MILES: f64 = 0.000621;

/// Distance to the destination at or below which the rider has arrived.
pub const ARRIVAL_THRESHOLD_M: f64 = 10.0;

pub const START_LABEL: &str = "Start riding";
pub const END_LABEL: &str = "End riding";

/// Inclusive arrival check.
pub fn has_arrived(distance_to_destination_m: f64) -> bool {
    distance_to_destination_m <= ARRIVAL_THRESHOLD_M
}

/// Progress readout for an active ride.
#[derive(Debug, Clone, PartialEq)]
pub struct RideSummary {
    pub traveled_m: f64,
    pub remaining_distance_text: Option<String>,
    pub estimated_duration_text: Option<String>,
    pub arrived: bool,
}

impl RideSummary {
    /// Builds the readout from the last known planned route, which may be
    /// stale until the next refresh resolves.
    pub fn new(traveled_m: f64, planned_route: Option<&RouteSummary>, arrived: bool) -> Self {
        Self {
            traveled_m,
            remaining_distance_text: planned_route.map(|r| r.remaining_distance_text.clone()),
            estimated_duration_text: planned_route.map(|r| r.estimated_duration_text.clone()),
            arrived,
        }
    }

    /// Traveled distance in miles, rounded to two decimals.
    pub fn traveled_miles(&self) -> f64 {
        (self.traveled_m * METERS_TO_MILES * 100.0).round() / 100.0
    }
}

impl fmt::Display for RideSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arrived {
            writeln!(f, "You have arrived at your destination")?;
        }
        writeln!(f, "Traveled: {:.2} mi", self.traveled_miles())?;
        writeln!(
            f,
            "Remaining: {}",
            self.remaining_distance_text.as_deref().unwrap_or("--")
        )?;
        write!(
            f,
            "Estimated time: {}",
            self.estimated_duration_text.as_deref().unwrap_or("--")
        )
    }
}

/// What the status label currently says.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusLabel {
    /// Initial placeholder, also restored when a ride ends.
    ChooseDestination,
    /// Start was pressed without a destination or a known position.
    SelectDestinationFirst,
    /// The location provider refused access.
    LocationUnavailable,
    Riding(RideSummary),
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLabel::ChooseDestination => write!(f, "Choose a destination"),
            StatusLabel::SelectDestinationFirst => write!(f, "Select a destination first"),
            StatusLabel::LocationUnavailable => {
                write!(f, "Location access is needed to track your ride")
            }
            StatusLabel::Riding(summary) => fmt::Display::fmt(summary, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrival_threshold_inclusive() {
        assert!(has_arrived(10.0));
        assert!(has_arrived(0.0));
        assert!(!has_arrived(10.01));
        assert!(!has_arrived(11.0));
    }

    #[test]
    fn test_traveled_miles_rounding() {
        let summary = RideSummary::new(1609.0, None, false);
        // 1609 m * 0.000621 = 0.999189
        assert_eq!(summary.traveled_miles(), 1.0);
    }

    #[test]
    fn test_summary_text_without_route() {
        let summary = RideSummary::new(0.0, None, false);
        assert_eq!(
            summary.to_string(),
            "Traveled: 0.00 mi\nRemaining: --\nEstimated time: --"
        );
    }

    #[test]
    fn test_arrival_notice_leads() {
        let summary = RideSummary::new(0.0, None, true);
        assert!(summary
            .to_string()
            .starts_with("You have arrived at your destination\n"));
    }

    #[test]
    fn test_placeholder_text() {
        assert_eq!(StatusLabel::ChooseDestination.to_string(), "Choose a destination");
    }
}
