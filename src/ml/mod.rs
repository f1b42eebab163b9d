//! Machine Learning Module
//!
//! The analysis pipeline consumes three kinds of per-region models:
//! - demand forecasters
//! - anomaly classifiers over `[utilization, residual, gap]`
//! - feature scalers over the same vector
//!
//! Models are never trained or updated here. They are loaded once into a
//! [`ModelRegistry`] and only read afterwards.

pub mod models;
pub mod registry;

pub use models::{Classifier, Forecaster, LinearDemandModel, Scaler, ScalerModel, ZScoreClassifier};
pub use registry::{ModelRegistry, ModelRegistryBuilder, RegionModels};
