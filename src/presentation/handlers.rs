// HTTP request handlers
use crate::application::advisory_service::LocationQuery;
use crate::domain::location::Coordinates;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct AdvisoryQuery {
    pub location: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl AdvisoryQuery {
    fn into_location_query(self) -> LocationQuery {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return LocationQuery::Point(Coordinates::new(lat, lon));
        }
        if let Some(name) = self.location {
            return LocationQuery::Preset(name);
        }
        if let Some(address) = self.address {
            return LocationQuery::Address(address);
        }
        LocationQuery::Default
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// One dashboard refresh: acquire, run the pipeline, return the payload.
/// Acquisition failure renders the system-offline state instead of an error.
pub async fn get_advisory(
    Query(query): Query<AdvisoryQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state
        .advisory_service
        .get_dashboard(query.into_location_query())
        .await
    {
        Ok(dashboard) => Json(dashboard).into_response(),
        Err(e) => {
            tracing::error!("advisory refresh failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "offline" })),
            )
                .into_response()
        }
    }
}

/// The configured location presets
pub async fn list_locations(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.advisory_service.presets().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(
        location: Option<&str>,
        address: Option<&str>,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> AdvisoryQuery {
        AdvisoryQuery {
            location: location.map(str::to_string),
            address: address.map(str::to_string),
            lat,
            lon,
        }
    }

    #[test]
    fn test_coordinates_win_over_names() {
        let q = query(Some("Gulberg III"), None, Some(31.5), Some(74.3));
        assert!(matches!(q.into_location_query(), LocationQuery::Point(_)));
    }

    #[test]
    fn test_lone_latitude_is_ignored() {
        let q = query(None, Some("Model Town"), Some(31.5), None);
        assert!(matches!(q.into_location_query(), LocationQuery::Address(_)));
    }

    #[test]
    fn test_empty_query_uses_default() {
        let q = query(None, None, None, None);
        assert!(matches!(q.into_location_query(), LocationQuery::Default));
    }
}
