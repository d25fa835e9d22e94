use fetchguard_core::ConfigError;
use thiserror::Error;

/// Errors raised while building a detection pipeline.
///
/// These are configuration bugs. Problems with the response itself are
/// always reported through a [`Verdict`](crate::Verdict), never here.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("invalid expected pattern '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid detector configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, DetectError>;
