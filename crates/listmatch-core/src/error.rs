//! Configuration error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or loading a [`crate::MatcherConfig`].
///
/// Matching itself never fails; degenerate inputs resolve to "no match".
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Threshold is NaN, infinite, or outside `[0.0, 1.0]`
    #[error("{name} must be a finite value in [0.0, 1.0], got {value}")]
    OutOfRange { name: &'static str, value: f64 },

    /// Environment override could not be parsed as a number
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    /// Config file could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config JSON could not be parsed
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
