//! San Francisco locations and canned directions responses.

use ride_navigator::coordinate::Coordinate;

/// Union Square.
pub const UNION_SQUARE: Coordinate = Coordinate::new(37.7858, -122.4064);

/// Civic Center.
pub const CIVIC_CENTER: Coordinate = Coordinate::new(37.7749, -122.4194);

/// A short ride down Market Street from Union Square.
pub const MARKET_STREET: [Coordinate; 5] = [
    Coordinate::new(37.7858, -122.4064),
    Coordinate::new(37.7847, -122.4077),
    Coordinate::new(37.7835, -122.4093),
    Coordinate::new(37.7822, -122.4110),
    Coordinate::new(37.7810, -122.4125),
];

pub const ROUTE_2_1_KM: &str = r#"{
    "status": "OK",
    "routes": [{
        "overview_polyline": { "points": "g`seF~nbjVzEbGnF~HbGrInFjH" },
        "legs": [{
            "distance": { "text": "2.1 km", "value": 2104 },
            "duration": { "text": "12 mins", "value": 722 }
        }]
    }]
}"#;

pub const ROUTE_1_4_KM: &str = r#"{
    "status": "OK",
    "routes": [{
        "overview_polyline": { "points": "g`seF~nbjVzEbG" },
        "legs": [{
            "distance": { "text": "1.4 km", "value": 1398 },
            "duration": { "text": "8 mins", "value": 480 }
        }]
    }]
}"#;

/// No `routes` field at all.
pub const NO_ROUTES: &str = r#"{ "status": "OK" }"#;

/// Valid legs, but the overview geometry decodes to coordinates far outside
/// the globe.
pub const CORRUPT_GEOMETRY: &str = r#"{
    "status": "OK",
    "routes": [{
        "overview_polyline": { "points": "}~~~~~~~~~~~F?}~~~~~~~~~~~F?}~~~~~~~~~~~F?" },
        "legs": [{
            "distance": { "text": "2.1 km", "value": 2104 },
            "duration": { "text": "12 mins", "value": 722 }
        }]
    }]
}"#;
