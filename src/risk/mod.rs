//! Inefficiency scoring from derived metrics and per-region models.

pub mod scorer;

pub use scorer::*;
