//! IdleGrid: regional grid health analysis and surplus transfer planning.
//!
//! The pipeline forecasts demand with per-region models, derives gap,
//! utilization and residual, scores inefficiency in [0, 1] and optionally asks
//! a text generation backend for a policy recommendation. A separate planner
//! proposes proportional transfers from surplus to deficit regions.

pub mod api;
pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod ml;
pub mod optimizer;
pub mod policy;
pub mod risk;
pub mod telemetry;
