//! Feature engineering for the demand forecasters
//!
//! Month is encoded cyclically so December and January sit next to each other.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::domain::ForecastInput;

/// Number of features consumed by a demand forecaster.
pub const DEMAND_FEATURE_COUNT: usize = 5;

/// Feature vector for next-hour demand forecasting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandFeatures {
    pub lag_24: f64,
    pub lag_168: f64,
    /// Hour of day (0-23)
    pub hour: f64,
    pub sin_month: f64,
    pub cos_month: f64,
}

impl DemandFeatures {
    pub fn new(lag_24: f64, lag_168: f64, hour: u32, month: u32) -> Self {
        let (sin_month, cos_month) = seasonal_encoding(month);
        Self {
            lag_24,
            lag_168,
            hour: f64::from(hour),
            sin_month,
            cos_month,
        }
    }

    /// Values in training order: lag_24, lag_168, hour, sin_month, cos_month.
    pub fn to_array(&self) -> [f64; DEMAND_FEATURE_COUNT] {
        [
            self.lag_24,
            self.lag_168,
            self.hour,
            self.sin_month,
            self.cos_month,
        ]
    }
}

impl From<&ForecastInput> for DemandFeatures {
    fn from(input: &ForecastInput) -> Self {
        Self::new(input.lag_24, input.lag_168, input.hour, input.month)
    }
}

fn seasonal_encoding(month: u32) -> (f64, f64) {
    let angle = 2.0 * PI * f64::from(month) / 12.0;
    (angle.sin(), angle.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order() {
        let f = DemandFeatures::new(100.0, 90.0, 14, 3);
        let arr = f.to_array();
        assert_eq!(arr[0], 100.0);
        assert_eq!(arr[1], 90.0);
        assert_eq!(arr[2], 14.0);
        assert!((arr[3] - 1.0).abs() < 1e-12); // sin(pi/2)
        assert!(arr[4].abs() < 1e-12);
    }

    #[test]
    fn test_december_wraps_to_january() {
        let dec = DemandFeatures::new(0.0, 0.0, 0, 12);
        let jan = DemandFeatures::new(0.0, 0.0, 0, 1);
        assert!(dec.sin_month.abs() < 1e-12);
        assert!((dec.cos_month - 1.0).abs() < 1e-12);
        let dist = ((dec.sin_month - jan.sin_month).powi(2)
            + (dec.cos_month - jan.cos_month).powi(2))
        .sqrt();
        assert!(dist < 0.6);
    }
}
