use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{AnalysisReport, DerivedMetrics, ForecastInput, RegionLoad, TransferPlan};
use crate::error::GridResult;
use crate::ml::ModelRegistry;
use crate::optimizer;
use crate::policy::{PolicyAdvisor, PolicyContext};
use crate::risk::{self, RiskAssessment};

/// Runs the per-request analysis pipeline against a read-only model registry.
///
/// Holds no per-request state, so one instance serves any number of
/// concurrent requests.
pub struct GridAnalyzer {
    registry: Arc<ModelRegistry>,
    advisor: PolicyAdvisor,
}

impl GridAnalyzer {
    pub fn new(registry: Arc<ModelRegistry>, advisor: PolicyAdvisor) -> Self {
        Self { registry, advisor }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Forecast, derive metrics, score and attach a policy recommendation.
    ///
    /// Only forecast failures are returned as errors. Scoring and policy
    /// generation fall back to their defaults.
    pub async fn analyze(&self, input: &ForecastInput) -> GridResult<AnalysisReport> {
        let region = input.region;
        let predicted_demand = self.registry.forecast(input)?;
        let metrics = DerivedMetrics::derive(predicted_demand, input.actual_demand, input.supply);

        let assessment = risk::score(
            region,
            &metrics,
            self.registry.classifier(region),
            self.registry.scaler(region),
        )
        .unwrap_or_else(|e| {
            warn!(region = %region, error = %e, "scoring unavailable, using defaults");
            RiskAssessment::fallback()
        });

        let policy_recommendation = self
            .advisor
            .recommend(&PolicyContext {
                region,
                predicted_demand,
                actual_demand: input.actual_demand,
                supply: input.supply,
                utilization: metrics.utilization,
                residual: metrics.residual,
                inefficiency_score: assessment.inefficiency_score,
                anomaly: assessment.anomaly,
            })
            .await;

        info!(
            region = %region,
            predicted_demand,
            gap = metrics.gap,
            anomaly = assessment.anomaly,
            score = assessment.inefficiency_score,
            "analysis complete"
        );

        Ok(AnalysisReport {
            region,
            predicted_demand,
            actual_demand: input.actual_demand,
            supply: input.supply,
            gap: metrics.gap,
            utilization_percent: metrics.utilization_percent(),
            residual: metrics.residual,
            anomaly_flag: assessment.anomaly_flag(),
            inefficiency_score: assessment.inefficiency_score,
            policy_recommendation,
        })
    }

    pub fn plan_distribution(&self, regions: &[RegionLoad]) -> GridResult<TransferPlan> {
        optimizer::plan(regions)
    }
}
