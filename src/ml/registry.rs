//! Per-region model registry.
//!
//! Built once during startup and shared behind an `Arc`. There is no way to
//! mutate a registry after [`ModelRegistryBuilder::build`], so request handlers
//! read it without synchronization.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::models::{Classifier, Forecaster, LinearDemandModel, Scaler, ScalerModel, ZScoreClassifier};
use crate::domain::{ForecastInput, RegionKey};
use crate::error::{GridError, GridResult};
use crate::forecast::DemandFeatures;

#[derive(Default, Clone)]
pub struct ModelRegistry {
    forecasters: HashMap<RegionKey, Arc<dyn Forecaster>>,
    classifiers: HashMap<RegionKey, Arc<dyn Classifier>>,
    scalers: HashMap<RegionKey, Arc<dyn Scaler>>,
}

/// Which models a region has available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionModels {
    pub forecaster: bool,
    pub classifier: bool,
    pub scaler: bool,
}

impl ModelRegistry {
    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder::default()
    }

    /// Load every `{Region}_model.json`, `{Region}_scaler.json` and
    /// `{Region}_isolation.json` found in `dir`. Missing files are skipped;
    /// unreadable or malformed files fail the whole load.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut builder = Self::builder();

        for region in RegionKey::all() {
            let name = region.to_string();

            if let Some(model) = load_json::<LinearDemandModel>(&dir.join(format!("{name}_model.json")))? {
                builder = builder.forecaster(region, model);
            }
            if let Some(scaler) = load_json::<ScalerModel>(&dir.join(format!("{name}_scaler.json")))? {
                builder = builder.scaler(region, scaler);
            }
            if let Some(clf) =
                load_json::<ZScoreClassifier>(&dir.join(format!("{name}_isolation.json")))?
            {
                builder = builder.classifier(region, clf);
            }
        }

        let registry = builder.build();
        for region in RegionKey::all() {
            let models = registry.models_for(region);
            info!(
                region = %region,
                forecaster = models.forecaster,
                classifier = models.classifier,
                scaler = models.scaler,
                "region models loaded"
            );
        }
        Ok(registry)
    }

    /// Run the region's forecaster.
    pub fn forecast(&self, input: &ForecastInput) -> GridResult<f64> {
        let forecaster = self
            .forecasters
            .get(&input.region)
            .ok_or(GridError::UnknownRegionModel(input.region))?;

        forecaster
            .forecast(&DemandFeatures::from(input))
            .map_err(|source| GridError::Forecast {
                region: input.region,
                source,
            })
    }

    pub fn classifier(&self, region: RegionKey) -> Option<&dyn Classifier> {
        self.classifiers.get(&region).map(|c| c.as_ref())
    }

    pub fn scaler(&self, region: RegionKey) -> Option<&dyn Scaler> {
        self.scalers.get(&region).map(|s| s.as_ref())
    }

    pub fn models_for(&self, region: RegionKey) -> RegionModels {
        RegionModels {
            forecaster: self.forecasters.contains_key(&region),
            classifier: self.classifiers.contains_key(&region),
            scaler: self.scalers.contains_key(&region),
        }
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut forecasters: Vec<_> = self.forecasters.keys().map(|r| r.to_string()).collect();
        forecasters.sort();
        f.debug_struct("ModelRegistry")
            .field("forecasters", &forecasters)
            .field("classifiers", &self.classifiers.len())
            .field("scalers", &self.scalers.len())
            .finish()
    }
}

#[derive(Default)]
pub struct ModelRegistryBuilder {
    inner: ModelRegistry,
}

impl ModelRegistryBuilder {
    pub fn forecaster(mut self, region: RegionKey, model: impl Forecaster + 'static) -> Self {
        self.inner.forecasters.insert(region, Arc::new(model));
        self
    }

    pub fn classifier(mut self, region: RegionKey, model: impl Classifier + 'static) -> Self {
        self.inner.classifiers.insert(region, Arc::new(model));
        self
    }

    pub fn scaler(mut self, region: RegionKey, model: impl Scaler + 'static) -> Self {
        self.inner.scalers.insert(region, Arc::new(model));
        self
    }

    pub fn build(self) -> ModelRegistry {
        self.inner
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        debug!(path = %path.display(), "model file not present");
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read model file {}", path.display()))?;
    let model = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse model file {}", path.display()))?;
    Ok(Some(model))
}
