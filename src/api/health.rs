use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::{controller::AppState, domain::RegionKey, ml::RegionModels};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    regions: BTreeMap<String, RegionModels>,
}

impl HealthResponse {
    fn from_models(regions: BTreeMap<String, RegionModels>) -> Self {
        let all_forecastable = regions.values().all(|m| m.forecaster);
        Self {
            status: if all_forecastable {
                "healthy".to_string()
            } else {
                "degraded".to_string()
            },
            timestamp: chrono::Utc::now(),
            regions,
        }
    }
}

/// GET / - Banner
pub async fn home() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "IdleGrid AI Backend Running" }))
}

/// GET /health - Model availability per region
///
/// Degraded means at least one region has no forecaster; the other regions
/// are still served, so the status code stays 200.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.analyzer.registry();
    let regions = RegionKey::all()
        .map(|r| (r.to_string(), registry.models_for(r)))
        .collect();
    let response = HealthResponse::from_models(regions);
    debug!(status = %response.status, "Health check completed");
    (StatusCode::OK, Json(response))
}

/// GET /health/live - Liveness probe
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /regions - Known region names
pub async fn list_regions() -> impl IntoResponse {
    let regions: Vec<String> = RegionKey::all().map(|r| r.to_string()).collect();
    Json(serde_json::json!({ "regions": regions }))
}
