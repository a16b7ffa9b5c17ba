use axum::{
    extract::{Query, Request, State, rejection::QueryRejection},
    http::{Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use common::errors::AppError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::IntoParams;

use crate::api_client::OpenWeatherClient;

const MISSING_COORDINATES: &str = "lat and lon required";
const INVALID_COORDINATES: &str = "lat and lon must be numbers";

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<OpenWeatherClient>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CoordinatesQuery {
    /// Latitude in decimal degrees
    pub lat: Option<String>,
    /// Longitude in decimal degrees
    pub lon: Option<String>,
}

impl CoordinatesQuery {
    /// Both values must be present, non-empty and finite
    pub fn coordinates(&self) -> Result<(f64, f64), AppError> {
        let (Some(lat), Some(lon)) = (non_empty(&self.lat), non_empty(&self.lon)) else {
            return Err(AppError::validation(MISSING_COORDINATES));
        };

        match (parse_degrees(lat), parse_degrees(lon)) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            _ => Err(AppError::validation(INVALID_COORDINATES)),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_degrees(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[utoipa::path(
    get,
    path = "/weather",
    params(CoordinatesQuery),
    responses(
        (status = 200, description = "Upstream current-weather JSON, unchanged", body = common::models::ObservationResponse),
        (status = 400, description = "lat and lon missing or not numeric"),
        (status = 500, description = "Upstream or internal failure")
    ),
    tag = "weather"
)]
pub async fn get_weather(
    State(state): State<AppState>,
    query: Result<Query<CoordinatesQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(params) = query.map_err(|rejection| {
        warn!(error = %rejection, "Rejected weather query");
        AppError::validation(MISSING_COORDINATES)
    })?;
    let (lat, lon) = params.coordinates()?;

    info!(lat, lon, "Weather request received");

    let body = state.client.current_weather(lat, lon).await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}

/// Only GET is served, whatever the path
pub async fn require_get(request: Request, next: Next) -> Result<Response, AppError> {
    if request.method() != Method::GET {
        warn!(method = %request.method(), path = %request.uri().path(), "Method not allowed");
        return Err(AppError::MethodNotAllowed);
    }

    Ok(next.run(request).await)
}
