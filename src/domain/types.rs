use serde::{Deserialize, Serialize};

use super::RegionKey;

/// One analysis request after the region has been resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastInput {
    pub region: RegionKey,
    /// Demand observed 24 hours before the forecast hour.
    pub lag_24: f64,
    /// Demand observed one week before the forecast hour.
    pub lag_168: f64,
    /// Hour of day (0-23)
    pub hour: u32,
    /// Month (1-12)
    pub month: u32,
    pub actual_demand: f64,
    pub supply: f64,
}

/// Demand and supply of a single region, input to the transfer planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionLoad {
    pub region: RegionKey,
    pub predicted_demand: f64,
    pub supply: f64,
}

impl RegionLoad {
    pub fn new(region: RegionKey, predicted_demand: f64, supply: f64) -> Self {
        Self {
            region,
            predicted_demand,
            supply,
        }
    }

    pub fn gap(&self) -> f64 {
        self.supply - self.predicted_demand
    }
}

/// A proposed movement of power between two regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferEntry {
    pub from: RegionKey,
    pub to: RegionKey,
    /// Amount rounded to two decimals.
    #[serde(rename = "power_transfer")]
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferPlan {
    pub total_surplus: f64,
    pub total_deficit: f64,
    /// Entries in generation order: deficit regions outer, surplus regions inner.
    pub transfer_plan: Vec<TransferEntry>,
}

impl TransferPlan {
    pub fn total_transferred(&self) -> f64 {
        self.transfer_plan.iter().map(|e| e.amount).sum()
    }
}

/// Full result of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub region: RegionKey,
    pub predicted_demand: f64,
    pub actual_demand: f64,
    pub supply: f64,
    pub gap: f64,
    pub utilization_percent: f64,
    pub residual: f64,
    /// 1 when the region's classifier flagged the metrics, else 0.
    pub anomaly_flag: u8,
    pub inefficiency_score: f64,
    pub policy_recommendation: String,
}
