//! Polyline representation for route geometries.
//!
//! Routes arrive from the directions service in the compact encoded polyline
//! format (precision 1e5). Decoding happens here, at the boundary; the rest of
//! the crate works with coordinate sequences.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coordinate::Coordinate;

const PRECISION: f64 = 1e5;
const MAX_LAT_E5: i64 = 90 * 100_000;
const MAX_LNG_E5: i64 = 180 * 100_000;

/// A polyline as decoded coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolylineError {
    #[error("invalid character {0:?} at byte {1}")]
    InvalidCharacter(char, usize),

    #[error("polyline ends inside a coordinate")]
    Truncated,

    #[error("point {0} lies outside valid latitude/longitude bounds")]
    OutOfRange(usize),
}

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of great-circle segment lengths, in meters.
    pub fn length_m(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }
}

/// Decodes an encoded polyline string.
pub fn decode(encoded: &str) -> Result<Polyline, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        let lat_delta = next_value(bytes, &mut index)?;
        if index >= bytes.len() {
            return Err(PolylineError::Truncated);
        }
        let lng_delta = next_value(bytes, &mut index)?;

        let out_of_range = PolylineError::OutOfRange(points.len());
        lat = lat
            .checked_add(lat_delta)
            .filter(|lat| lat.abs() <= MAX_LAT_E5)
            .ok_or_else(|| out_of_range.clone())?;
        lng = lng
            .checked_add(lng_delta)
            .filter(|lng| lng.abs() <= MAX_LNG_E5)
            .ok_or(out_of_range)?;

        points.push(Coordinate::new(
            lat as f64 / PRECISION,
            lng as f64 / PRECISION,
        ));
    }

    Ok(Polyline { points })
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::Truncated);
        };
        if !(63..=126).contains(&byte) || shift > 60 {
            return Err(PolylineError::InvalidCharacter(byte as char, *index));
        }
        *index += 1;

        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Encodes coordinates into the polyline format.
pub fn encode(points: &[Coordinate]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = (point.lat * PRECISION).round() as i64;
        let lng = (point.lng * PRECISION).round() as i64;
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn push_value(out: &mut String, delta: i64) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
    while value >= 0x20 {
        out.push(((0x20 | (value & 0x1f)) + 63) as u8 as char);
        value >>= 5;
    }
    out.push((value + 63) as u8 as char);
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn example_points() -> Vec<Coordinate> {
        vec![
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ]
    }

    fn assert_close(a: &[Coordinate], b: &[Coordinate]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x.lat - y.lat).abs() < 1e-9, "{:?} vs {:?}", x, y);
            assert!((x.lng - y.lng).abs() < 1e-9, "{:?} vs {:?}", x, y);
        }
    }

    #[test]
    fn test_decode_reference_example() {
        let polyline = decode(EXAMPLE).unwrap();
        assert_close(polyline.points(), &example_points());
    }

    #[test]
    fn test_encode_reference_example() {
        assert_eq!(encode(&example_points()), EXAMPLE);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_truncated() {
        // Latitude only, no longitude.
        assert_eq!(decode("_p~iF"), Err(PolylineError::Truncated));
        // Continuation bit set on the last byte.
        assert_eq!(decode("_p~i"), Err(PolylineError::Truncated));
    }

    #[test]
    fn test_decode_invalid_character() {
        assert!(matches!(
            decode("_p~iF ps|U"),
            Err(PolylineError::InvalidCharacter(' ', 5))
        ));
    }

    #[test]
    fn test_decode_huge_deltas_rejected() {
        // Each chunk decodes to a latitude delta near 2^62.
        let corrupt = "}~~~~~~~~~~~F?".repeat(3);
        assert_eq!(decode(&corrupt), Err(PolylineError::OutOfRange(0)));
    }

    #[test]
    fn test_decode_leaving_bounds_rejected() {
        // Two valid-looking steps of +60 degrees latitude.
        let encoded = encode(&[Coordinate::new(60.0, 0.0)]).repeat(2);
        assert_eq!(decode(&encoded), Err(PolylineError::OutOfRange(1)));
    }

    #[test]
    fn test_length_of_single_point_is_zero() {
        let polyline = Polyline::new(vec![Coordinate::new(1.0, 2.0)]);
        assert_eq!(polyline.length_m(), 0.0);
    }

    #[test]
    fn test_into_points() {
        let polyline = Polyline::new(example_points());
        assert_eq!(polyline.into_points(), example_points());
    }
}
