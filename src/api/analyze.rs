use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::{
    api::error::ApiError,
    controller::AppState,
    domain::{AnalysisReport, ForecastInput, RegionKey},
    error::{GridError, GridResult},
};

/// Body of `POST /analyze`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalysisRequest {
    pub region: String,
    pub lag_24: f64,
    pub lag_168: f64,
    #[validate(range(min = 0, max = 23))]
    pub hour: u32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    #[validate(range(min = 0.0))]
    pub actual_demand: f64,
    #[validate(range(min = 0.0))]
    pub supply: f64,
}

impl AnalysisRequest {
    /// Resolve the region, then check field ranges.
    pub fn into_input(self) -> GridResult<ForecastInput> {
        let region = parse_region(&self.region)?;
        self.validate()?;
        Ok(ForecastInput {
            region,
            lag_24: self.lag_24,
            lag_168: self.lag_168,
            hour: self.hour,
            month: self.month,
            actual_demand: self.actual_demand,
            supply: self.supply,
        })
    }
}

pub(crate) fn parse_region(raw: &str) -> GridResult<RegionKey> {
    raw.parse()
        .map_err(|_| GridError::InvalidRegion(raw.to_string()))
}

/// POST /analyze - Forecast, score and advise on a single region
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let input = request.into_input()?;
    let report = state.analyzer.analyze(&input).await?;
    Ok(Json(report))
}
