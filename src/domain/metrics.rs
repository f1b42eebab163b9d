use serde::{Deserialize, Serialize};

/// Added to supply before dividing so utilization stays finite at zero supply.
pub const EPSILON: f64 = 1e-6;

/// Figures derived from a forecast and the observed demand/supply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Supply minus predicted demand. Positive is surplus, negative is deficit.
    pub gap: f64,
    /// Predicted demand as a fraction of supply.
    ///
    /// Finite for realistic inputs. At zero supply a forecast above about
    /// 1.8e302 overflows to +inf, which serializes as `null`.
    pub utilization: f64,
    /// Actual minus predicted demand (signed forecast error).
    pub residual: f64,
}

impl DerivedMetrics {
    pub fn derive(predicted_demand: f64, actual_demand: f64, supply: f64) -> Self {
        Self {
            gap: supply - predicted_demand,
            utilization: predicted_demand / (supply + EPSILON),
            residual: actual_demand - predicted_demand,
        }
    }

    pub fn utilization_percent(&self) -> f64 {
        self.utilization * 100.0
    }

    /// Feature order expected by the per-region classifier and scaler.
    pub fn as_features(&self) -> [f64; 3] {
        [self.utilization, self.residual, self.gap]
    }
}
