use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::{DerivedMetrics, RegionKey};
use crate::ml::{Classifier, Scaler};

/// Weight of under-utilization, applied to `1 - scaled_utilization`.
pub const UTILIZATION_WEIGHT: f64 = 0.40;
/// Weight of the scaled forecast residual.
pub const RESIDUAL_WEIGHT: f64 = 0.30;
/// Weight of the scaled supply/demand gap.
pub const GAP_WEIGHT: f64 = 0.20;
/// Fixed contribution of a flagged anomaly.
pub const ANOMALY_WEIGHT: f64 = 0.10;

/// A model call failed, so no trustworthy score can be produced.
#[derive(Debug, Error)]
pub enum ScoringUnavailable {
    #[error("anomaly classifier failed: {0}")]
    Classifier(#[source] anyhow::Error),

    #[error("feature scaler failed: {0}")]
    Scaler(#[source] anyhow::Error),

    #[error("feature scaler returned non-finite values")]
    NonFinite,
}

/// Scaler output with every component clamped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaledFeatures {
    pub utilization: f64,
    pub residual: f64,
    pub gap: f64,
}

impl ScaledFeatures {
    /// Clamp raw scaler output. NaN or infinite components cannot be clamped
    /// meaningfully and are reported as unavailable.
    pub fn clamped(raw: [f64; 3]) -> Result<Self, ScoringUnavailable> {
        if raw.iter().any(|v| !v.is_finite()) {
            return Err(ScoringUnavailable::NonFinite);
        }
        Ok(Self {
            utilization: raw[0].clamp(0.0, 1.0),
            residual: raw[1].clamp(0.0, 1.0),
            gap: raw[2].clamp(0.0, 1.0),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RiskAssessment {
    pub anomaly: bool,
    /// Always within [0, 1].
    pub inefficiency_score: f64,
}

impl RiskAssessment {
    /// Used whenever scoring is unavailable: no anomaly, zero score.
    pub fn fallback() -> Self {
        Self::default()
    }

    pub fn anomaly_flag(&self) -> u8 {
        u8::from(self.anomaly)
    }
}

/// Weighted blend of the clamped features and the anomaly flag, clamped to [0, 1].
pub fn blend(scaled: &ScaledFeatures, anomaly: bool) -> f64 {
    let anomaly = if anomaly { 1.0 } else { 0.0 };
    let raw = UTILIZATION_WEIGHT * (1.0 - scaled.utilization)
        + RESIDUAL_WEIGHT * scaled.residual
        + GAP_WEIGHT * scaled.gap
        + ANOMALY_WEIGHT * anomaly;
    raw.clamp(0.0, 1.0)
}

/// Score a region's metrics with whatever models it has registered.
///
/// Without a classifier the anomaly flag is false; without a scaler the score
/// is 0. A failing model call yields [`ScoringUnavailable`].
pub fn score(
    region: RegionKey,
    metrics: &DerivedMetrics,
    classifier: Option<&dyn Classifier>,
    scaler: Option<&dyn Scaler>,
) -> Result<RiskAssessment, ScoringUnavailable> {
    let features = metrics.as_features();

    let anomaly = match classifier {
        Some(c) => c.classify(&features).map_err(ScoringUnavailable::Classifier)?,
        None => false,
    };

    let inefficiency_score = match scaler {
        Some(s) => {
            let raw = s.transform(&features).map_err(ScoringUnavailable::Scaler)?;
            blend(&ScaledFeatures::clamped(raw)?, anomaly)
        }
        None => 0.0,
    };

    debug!(region = %region, anomaly, score = inefficiency_score, "risk scored");
    Ok(RiskAssessment {
        anomaly,
        inefficiency_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::models::{MockClassifier, MockScaler};
    use proptest::prelude::*;

    struct FixedScaler([f64; 3]);

    impl Scaler for FixedScaler {
        fn transform(&self, _features: &[f64; 3]) -> anyhow::Result<[f64; 3]> {
            Ok(self.0)
        }
    }

    struct FixedClassifier(bool);

    impl Classifier for FixedClassifier {
        fn classify(&self, _features: &[f64; 3]) -> anyhow::Result<bool> {
            Ok(self.0)
        }
    }

    fn metrics() -> DerivedMetrics {
        DerivedMetrics::derive(80.0, 85.0, 100.0)
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum = UTILIZATION_WEIGHT + RESIDUAL_WEIGHT + GAP_WEIGHT + ANOMALY_WEIGHT;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fully_utilized_without_anomaly_scores_zero() {
        let scaled = ScaledFeatures::clamped([1.0, 0.0, 0.0]).unwrap();
        assert_eq!(blend(&scaled, false), 0.0);
    }

    #[test]
    fn test_idle_with_anomaly_scores_half() {
        let scaled = ScaledFeatures::clamped([0.0, 0.0, 0.0]).unwrap();
        assert!((blend(&scaled, true) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_worst_case_scores_one() {
        let scaled = ScaledFeatures::clamped([0.0, 1.0, 1.0]).unwrap();
        assert!((blend(&scaled, true) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_scaler_output_is_clamped() {
        let scaled = ScaledFeatures::clamped([-3.0, 7.5, 1.2]).unwrap();
        assert_eq!(
            scaled,
            ScaledFeatures {
                utilization: 0.0,
                residual: 1.0,
                gap: 1.0
            }
        );
    }

    #[test]
    fn test_non_finite_scaler_output_is_unavailable() {
        let scaler = FixedScaler([0.5, f64::NAN, 0.5]);
        let result = score(RegionKey::Northern, &metrics(), None, Some(&scaler));
        assert!(matches!(result, Err(ScoringUnavailable::NonFinite)));
    }

    #[test]
    fn test_overflowed_utilization_is_unavailable() {
        let overflowed = DerivedMetrics::derive(1e303, 0.0, 0.0);
        let scaler = crate::ml::ScalerModel::MinMax {
            data_min: [0.0, -20.0, -20.0],
            data_max: [1.0, 20.0, 60.0],
        };
        let result = score(RegionKey::Northern, &overflowed, None, Some(&scaler));
        assert!(matches!(result, Err(ScoringUnavailable::NonFinite)));
    }

    #[test]
    fn test_no_models_yields_defaults() {
        let assessment = score(RegionKey::Eastern, &metrics(), None, None).unwrap();
        assert_eq!(assessment, RiskAssessment::fallback());
        assert_eq!(assessment.anomaly_flag(), 0);
    }

    #[test]
    fn test_anomaly_without_scaler_keeps_zero_score() {
        let clf = FixedClassifier(true);
        let assessment = score(RegionKey::Eastern, &metrics(), Some(&clf), None).unwrap();
        assert!(assessment.anomaly);
        assert_eq!(assessment.anomaly_flag(), 1);
        assert_eq!(assessment.inefficiency_score, 0.0);
    }

    #[test]
    fn test_models_receive_metric_vector() {
        let m = metrics();
        let expected = m.as_features();

        let mut clf = MockClassifier::new();
        clf.expect_classify()
            .withf(move |f| *f == expected)
            .times(1)
            .returning(|_| Ok(false));
        let mut scaler = MockScaler::new();
        scaler
            .expect_transform()
            .withf(move |f| *f == expected)
            .times(1)
            .returning(|_| Ok([0.5, 0.5, 0.5]));

        let assessment = score(RegionKey::Southern, &m, Some(&clf), Some(&scaler)).unwrap();
        // 0.4*0.5 + 0.3*0.5 + 0.2*0.5
        assert!((assessment.inefficiency_score - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_classifier_failure_is_unavailable() {
        let mut clf = MockClassifier::new();
        clf.expect_classify()
            .returning(|_| Err(anyhow::anyhow!("bad input")));
        let scaler = FixedScaler([0.5, 0.5, 0.5]);
        let result = score(RegionKey::Western, &metrics(), Some(&clf), Some(&scaler));
        assert!(matches!(result, Err(ScoringUnavailable::Classifier(_))));
    }

    #[test]
    fn test_scaler_failure_is_unavailable() {
        let mut scaler = MockScaler::new();
        scaler
            .expect_transform()
            .returning(|_| Err(anyhow::anyhow!("shape mismatch")));
        let result = score(RegionKey::Western, &metrics(), None, Some(&scaler));
        assert!(matches!(result, Err(ScoringUnavailable::Scaler(_))));
    }

    #[test]
    fn test_score_is_idempotent() {
        let clf = FixedClassifier(true);
        let scaler = FixedScaler([0.3, 0.6, 0.1]);
        let a = score(RegionKey::Northern, &metrics(), Some(&clf), Some(&scaler)).unwrap();
        let b = score(RegionKey::Northern, &metrics(), Some(&clf), Some(&scaler)).unwrap();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn score_stays_in_unit_interval(
            u in -1e6f64..1e6,
            r in -1e6f64..1e6,
            g in -1e6f64..1e6,
            anomaly in any::<bool>(),
        ) {
            let clf = FixedClassifier(anomaly);
            let scaler = FixedScaler([u, r, g]);
            let assessment = score(RegionKey::Southern, &metrics(), Some(&clf), Some(&scaler)).unwrap();
            prop_assert!((0.0..=1.0).contains(&assessment.inefficiency_score));
        }
    }
}
