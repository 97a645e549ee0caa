// HTTP request handlers
use crate::domain::error::AqiError;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Header naming the viewer whose visibility settings apply
pub const VIEWER_HEADER: &str = "x-viewer-id";

#[derive(Deserialize)]
pub struct AqiQuery {
    pub q: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

async fn respond<T: Serialize>(data: &T, status: StatusCode, compress: bool) -> Response {
    match json_response(data, status, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn error_response(status: StatusCode, message: String, compress: bool) -> Response {
    respond(&ErrorBody { error: message }, status, compress).await
}

fn status_for(err: &anyhow::Error) -> StatusCode {
    match err.downcast_ref::<AqiError>() {
        Some(AqiError::PlaceNotFound(_)) | Some(AqiError::NoData) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn viewer_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(VIEWER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current AQI, series and daily summary for a place, redacted for the viewer
pub async fn get_aqi(
    Query(query): Query<AqiQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let compress = accepts_brotli(&headers);

    let Some(place) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Enter a city or ZIP code.".to_string(),
            compress,
        )
        .await;
    };

    let viewer = viewer_id(&headers);

    match state.aqi_service.lookup(place, viewer).await {
        Ok(report) => respond(&report, StatusCode::OK, compress).await,
        Err(e) => {
            let status = status_for(&e);
            tracing::warn!("AQI lookup for {} failed: {:#}", place, e);
            error_response(status, e.to_string(), compress).await
        }
    }
}

/// Stored hourly measurements for a location, redacted for the viewer
pub async fn list_measurements(
    Path(location_id): Path<u64>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let compress = accepts_brotli(&headers);
    let viewer = viewer_id(&headers);

    match state.aqi_service.measurements(location_id, viewer).await {
        Ok(rows) => respond(&rows, StatusCode::OK, compress).await,
        Err(e) => {
            tracing::error!("Error fetching measurements for {}: {}", location_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), compress).await
        }
    }
}
