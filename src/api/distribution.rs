use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::{
    api::{analyze::parse_region, error::ApiError},
    controller::AppState,
    domain::{RegionLoad, TransferPlan},
    error::{GridError, GridResult},
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegionLoadRequest {
    pub region: String,
    #[validate(range(min = 0.0))]
    pub predicted_demand: f64,
    #[validate(range(min = 0.0))]
    pub supply: f64,
}

/// Body of `POST /optimize-distribution`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DistributionRequest {
    #[validate(nested)]
    pub regions: Vec<RegionLoadRequest>,
}

impl DistributionRequest {
    /// Reject an empty list, resolve every region, then check field ranges.
    pub fn into_loads(self) -> GridResult<Vec<RegionLoad>> {
        if self.regions.is_empty() {
            return Err(GridError::EmptyInput);
        }
        let regions = self
            .regions
            .iter()
            .map(|r| parse_region(&r.region))
            .collect::<GridResult<Vec<_>>>()?;
        self.validate()?;

        Ok(regions
            .into_iter()
            .zip(self.regions)
            .map(|(region, r)| RegionLoad::new(region, r.predicted_demand, r.supply))
            .collect())
    }
}

/// POST /optimize-distribution - Plan surplus transfers between regions
pub async fn optimize_distribution(
    State(state): State<AppState>,
    Json(request): Json<DistributionRequest>,
) -> Result<Json<TransferPlan>, ApiError> {
    let loads = request.into_loads()?;
    let plan = state.analyzer.plan_distribution(&loads)?;
    info!(
        regions = loads.len(),
        entries = plan.transfer_plan.len(),
        "distribution planned"
    );
    Ok(Json(plan))
}
