//! Directions HTTP adapter for bicycling routes.

use serde::Deserialize;
use tracing::debug;

use crate::coordinate::Coordinate;
use crate::route::{RouteQueryError, RouteSummary};
use crate::traits::RouteProvider;

pub const DEFAULT_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Travel mode sent with every query.
const TRAVEL_MODE: &str = "bicycling";

#[derive(Clone)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl DirectionsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_DIRECTIONS_URL.to_string(),
            api_key: api_key.into(),
            timeout_secs: 10,
        }
    }
}

impl std::fmt::Debug for DirectionsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectionsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct DirectionsClient {
    config: DirectionsConfig,
    client: reqwest::blocking::Client,
}

impl DirectionsClient {
    pub fn new(config: DirectionsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RouteProvider for DirectionsClient {
    fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteSummary, RouteQueryError> {
        debug!(%origin, %destination, "requesting bicycling directions");

        let body = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("origin", origin.to_query_param()),
                ("destination", destination.to_query_param()),
                ("mode", TRAVEL_MODE.to_string()),
                ("key", self.config.api_key.clone()),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())?;

        parse_response(&body, origin, destination)
    }
}

/// Extracts a route summary from a directions response body.
///
/// Only the first route and its first leg are considered.
pub fn parse_response(
    body: &str,
    origin: Coordinate,
    destination: Coordinate,
) -> Result<RouteSummary, RouteQueryError> {
    let response: DirectionsResponse = serde_json::from_str(body)
        .map_err(|err| RouteQueryError::MalformedResponse(err.to_string()))?;

    let Some(route) = response.routes.and_then(|routes| routes.into_iter().next()) else {
        return Err(match response.status.as_deref() {
            None | Some("OK") | Some("ZERO_RESULTS") | Some("NOT_FOUND") => {
                RouteQueryError::NoRouteFound {
                    origin,
                    destination,
                }
            }
            Some(status) => RouteQueryError::Rejected {
                status: status.to_string(),
                message: response.error_message.unwrap_or_default(),
            },
        });
    };

    let encoded_polyline = route
        .overview_polyline
        .and_then(|overview| overview.points)
        .ok_or_else(|| missing("routes[0].overview_polyline.points"))?;

    let leg = route
        .legs
        .and_then(|legs| legs.into_iter().next())
        .ok_or_else(|| missing("routes[0].legs[0]"))?;

    let distance = leg.distance.ok_or_else(|| missing("legs[0].distance"))?;
    let duration = leg.duration.ok_or_else(|| missing("legs[0].duration"))?;

    Ok(RouteSummary {
        encoded_polyline,
        remaining_distance_text: distance.text.ok_or_else(|| missing("legs[0].distance.text"))?,
        estimated_duration_text: duration.text.ok_or_else(|| missing("legs[0].duration.text"))?,
        remaining_distance_m: distance.value,
        estimated_duration_s: duration.value,
    })
}

fn missing(field: &str) -> RouteQueryError {
    RouteQueryError::MalformedResponse(format!("missing {}", field))
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: Option<String>,
    error_message: Option<String>,
    routes: Option<Vec<DirectionsRoute>>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    overview_polyline: Option<OverviewPolyline>,
    legs: Option<Vec<DirectionsLeg>>,
}

#[derive(Debug, Deserialize)]
struct OverviewPolyline {
    points: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: Option<String>,
    value: Option<f64>,
}
