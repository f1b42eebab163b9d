//! Model capabilities and their stand-in implementations.
//!
//! The pipeline only depends on the three traits. The concrete models are small
//! serde-loadable stand-ins so a region can be served without the original
//! training stack.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::forecast::{DemandFeatures, DEMAND_FEATURE_COUNT};

/// Predicts next-hour demand for one region.
#[cfg_attr(test, mockall::automock)]
pub trait Forecaster: Send + Sync {
    fn forecast(&self, features: &DemandFeatures) -> Result<f64>;
}

/// Flags `[utilization, residual, gap]` vectors as anomalous.
#[cfg_attr(test, mockall::automock)]
pub trait Classifier: Send + Sync {
    fn classify(&self, features: &[f64; 3]) -> Result<bool>;
}

/// Maps `[utilization, residual, gap]` into the range seen during training.
#[cfg_attr(test, mockall::automock)]
pub trait Scaler: Send + Sync {
    fn transform(&self, features: &[f64; 3]) -> Result<[f64; 3]>;
}

/// Linear regression over the demand features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearDemandModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearDemandModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// Persistence model: predicts the demand seen 24 hours earlier.
    pub fn persistence() -> Self {
        Self::new(vec![1.0, 0.0, 0.0, 0.0, 0.0], 0.0)
    }
}

impl Forecaster for LinearDemandModel {
    fn forecast(&self, features: &DemandFeatures) -> Result<f64> {
        if self.coefficients.len() != DEMAND_FEATURE_COUNT {
            anyhow::bail!(
                "Feature count mismatch: expected {}, got {}",
                DEMAND_FEATURE_COUNT,
                self.coefficients.len()
            );
        }

        let prediction = features
            .to_array()
            .iter()
            .zip(self.coefficients.iter())
            .map(|(f, c)| f * c)
            .sum::<f64>()
            + self.intercept;

        if !prediction.is_finite() {
            anyhow::bail!("Forecast produced a non-finite value");
        }
        Ok(prediction)
    }
}

/// Flags a vector when any component lies more than `threshold` standard
/// deviations away from the training mean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZScoreClassifier {
    pub mean: [f64; 3],
    pub std: [f64; 3],
    pub threshold: f64,
}

impl Classifier for ZScoreClassifier {
    fn classify(&self, features: &[f64; 3]) -> Result<bool> {
        if features.iter().any(|f| !f.is_finite()) {
            anyhow::bail!("Cannot classify non-finite features");
        }

        let anomalous = features
            .iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(f, (mean, std))| {
                if std.abs() < 1e-10 {
                    0.0
                } else {
                    (f - mean) / std
                }
            })
            .any(|z| z.abs() > self.threshold);

        Ok(anomalous)
    }
}

/// Feature scaler fitted offline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerModel {
    MinMax { data_min: [f64; 3], data_max: [f64; 3] },
    Standard { mean: [f64; 3], scale: [f64; 3] },
}

impl Scaler for ScalerModel {
    fn transform(&self, features: &[f64; 3]) -> Result<[f64; 3]> {
        let mut out = [0.0; 3];
        match self {
            ScalerModel::MinMax { data_min, data_max } => {
                for i in 0..3 {
                    let range = data_max[i] - data_min[i];
                    out[i] = if range.abs() < 1e-10 {
                        0.5
                    } else {
                        (features[i] - data_min[i]) / range
                    };
                }
            }
            ScalerModel::Standard { mean, scale } => {
                for i in 0..3 {
                    out[i] = if scale[i].abs() < 1e-10 {
                        0.0
                    } else {
                        (features[i] - mean[i]) / scale[i]
                    };
                }
            }
        }
        Ok(out)
    }
}
