pub mod analyzer;

use anyhow::{Context, Result};
use std::sync::Arc;

pub use analyzer::GridAnalyzer;

use crate::config::Config;
use crate::ml::ModelRegistry;
use crate::policy::PolicyAdvisor;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub analyzer: Arc<GridAnalyzer>,
}

impl AppState {
    /// Load every region's models and configure policy backends. Runs once,
    /// before the server accepts requests.
    pub fn new(cfg: Config) -> Result<Self> {
        let registry = ModelRegistry::load_from_dir(&cfg.models.dir).with_context(|| {
            format!("failed to load models from {}", cfg.models.dir.display())
        })?;
        let advisor = PolicyAdvisor::from_config(&cfg.policy)?;
        Ok(Self::from_parts(cfg, registry, advisor))
    }

    pub fn from_parts(cfg: Config, registry: ModelRegistry, advisor: PolicyAdvisor) -> Self {
        Self {
            cfg,
            analyzer: Arc::new(GridAnalyzer::new(Arc::new(registry), advisor)),
        }
    }
}
