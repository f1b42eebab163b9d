use thiserror::Error;

use crate::domain::RegionKey;

/// Failures that reach the caller of an analysis or planning request.
///
/// Scoring and text generation failures are absorbed where they happen and
/// never appear here.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("No forecast model registered for region {0}")]
    UnknownRegionModel(RegionKey),

    #[error("Forecast failed for region {region}: {source}")]
    Forecast {
        region: RegionKey,
        #[source]
        source: anyhow::Error,
    },

    #[error("No regions provided")]
    EmptyInput,

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type GridResult<T> = std::result::Result<T, GridError>;

impl From<validator::ValidationErrors> for GridError {
    fn from(errors: validator::ValidationErrors) -> Self {
        GridError::Validation(errors.to_string())
    }
}
