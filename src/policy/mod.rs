//! Natural-language policy recommendations.
//!
//! Backends are tried in configured order. The first non-empty answer wins;
//! when every backend fails, or none is configured, the fixed
//! [`DEFAULT_POLICY`] is returned. Failures are logged and never reach the
//! caller.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub mod gemini;
pub mod prompt;

pub use gemini::GeminiBackend;
pub use prompt::{build_prompt, PolicyContext};

use crate::config::PolicyConfig;

pub const DEFAULT_POLICY: &str = "Grid health is currently at Moderate Risk. \
    Utilization metrics suggest structural imbalances between supply and demand. \
    Immediate action: Deploy localized demand-response protocols. \
    Long-term: Invest in grid-scale storage to mitigate residual variance.";

#[derive(Debug, Error)]
pub enum TextGenerationFailed {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("backend returned no text")]
    EmptyResponse,
}

/// A text generation service able to answer a policy prompt.
#[async_trait]
pub trait PolicyBackend: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, TextGenerationFailed>;
}

#[derive(Clone, Default)]
pub struct PolicyAdvisor {
    backends: Vec<Arc<dyn PolicyBackend>>,
}

impl PolicyAdvisor {
    pub fn new(backends: Vec<Arc<dyn PolicyBackend>>) -> Self {
        Self { backends }
    }

    /// Advisor that always answers with [`DEFAULT_POLICY`].
    pub fn disabled() -> Self {
        Self::default()
    }

    /// One Gemini backend per configured model, or none without an API key.
    pub fn from_config(cfg: &PolicyConfig) -> anyhow::Result<Self> {
        let Some(api_key) = cfg.api_key.as_deref().filter(|k| !k.is_empty()) else {
            info!("no policy API key configured, using default policy text");
            return Ok(Self::disabled());
        };

        let timeout = Duration::from_secs(cfg.http_timeout_secs);
        let backends = cfg
            .models
            .iter()
            .map(|model| {
                GeminiBackend::new(cfg.base_url.clone(), api_key, model.clone(), timeout)
                    .map(|b| Arc::new(b) as Arc<dyn PolicyBackend>)
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        info!(backends = backends.len(), "policy backends configured");
        Ok(Self::new(backends))
    }

    pub fn backend_count(&self) -> usize {
        self.backends.len()
    }

    pub async fn recommend(&self, ctx: &PolicyContext) -> String {
        if self.backends.is_empty() {
            return DEFAULT_POLICY.to_string();
        }

        let prompt = build_prompt(ctx);
        for backend in &self.backends {
            match backend.generate(&prompt).await {
                Ok(text) if !text.trim().is_empty() => return text,
                Ok(_) => {
                    warn!(backend = backend.name(), region = %ctx.region, "policy backend returned empty text")
                }
                Err(e) => {
                    warn!(backend = backend.name(), region = %ctx.region, error = %e, "policy backend failed")
                }
            }
        }

        DEFAULT_POLICY.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RegionKey;

    fn ctx() -> PolicyContext {
        PolicyContext {
            region: RegionKey::Western,
            predicted_demand: 100.0,
            actual_demand: 95.0,
            supply: 130.0,
            utilization: 0.77,
            residual: -5.0,
            inefficiency_score: 0.31,
            anomaly: false,
        }
    }

    struct StubBackend {
        name: &'static str,
        result: fn() -> Result<String, TextGenerationFailed>,
    }

    #[async_trait]
    impl PolicyBackend for StubBackend {
        fn name(&self) -> &str {
            self.name
        }

        async fn generate(&self, _prompt: &str) -> Result<String, TextGenerationFailed> {
            (self.result)()
        }
    }

    fn backend(
        name: &'static str,
        result: fn() -> Result<String, TextGenerationFailed>,
    ) -> Arc<dyn PolicyBackend> {
        Arc::new(StubBackend { name, result })
    }

    #[tokio::test]
    async fn test_no_backends_returns_default() {
        let advisor = PolicyAdvisor::disabled();
        assert_eq!(advisor.recommend(&ctx()).await, DEFAULT_POLICY);
    }

    #[tokio::test]
    async fn test_first_successful_backend_wins() {
        let advisor = PolicyAdvisor::new(vec![
            backend("primary", || Ok("Primary advice.".to_string())),
            backend("secondary", || Ok("Secondary advice.".to_string())),
        ]);
        assert_eq!(advisor.recommend(&ctx()).await, "Primary advice.");
    }

    #[tokio::test]
    async fn test_falls_through_failed_backends() {
        let advisor = PolicyAdvisor::new(vec![
            backend("primary", || Err(TextGenerationFailed::EmptyResponse)),
            backend("empty", || Ok("   ".to_string())),
            backend("fallback", || Ok("Fallback advice.".to_string())),
        ]);
        assert_eq!(advisor.recommend(&ctx()).await, "Fallback advice.");
    }

    #[tokio::test]
    async fn test_all_backends_failing_returns_default() {
        let advisor = PolicyAdvisor::new(vec![
            backend("a", || {
                Err(TextGenerationFailed::Status {
                    status: 500,
                    body: "boom".to_string(),
                })
            }),
            backend("b", || Err(TextGenerationFailed::EmptyResponse)),
        ]);
        assert_eq!(advisor.recommend(&ctx()).await, DEFAULT_POLICY);
    }

    #[test]
    fn test_from_config_without_key_is_disabled() {
        let cfg = PolicyConfig::default();
        assert_eq!(PolicyAdvisor::from_config(&cfg).unwrap().backend_count(), 0);

        let cfg = PolicyConfig {
            api_key: Some(String::new()),
            ..PolicyConfig::default()
        };
        assert_eq!(PolicyAdvisor::from_config(&cfg).unwrap().backend_count(), 0);
    }

    #[test]
    fn test_from_config_builds_backend_per_model() {
        let cfg = PolicyConfig {
            api_key: Some("secret".to_string()),
            ..PolicyConfig::default()
        };
        let advisor = PolicyAdvisor::from_config(&cfg).unwrap();
        assert_eq!(advisor.backend_count(), cfg.models.len());
    }
}
