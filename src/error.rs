//! Error types for input validation and settings loading.
//!
//! The numerical core never returns errors: degenerate inputs resolve to
//! `None` or empty values. The variants here cover contract violations that
//! callers check at the boundary, and failures while loading settings.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised outside the numerical core.
#[derive(Debug, Error)]
pub enum SpcError {
    /// Subgroup size must be at least 1.
    #[error("subgroup size must be at least 1, got {0}")]
    InvalidSubgroupSize(usize),

    /// A sample value is NaN or infinite.
    #[error("sample {index} is not finite: {value}")]
    NonFiniteSample { index: usize, value: f64 },

    /// Cpk status thresholds are not ordered `excellent >= good >= acceptable`.
    #[error(
        "cpk thresholds must satisfy excellent >= good >= acceptable \
         (got {excellent}, {good}, {acceptable})"
    )]
    InvalidThresholds {
        excellent: f64,
        good: f64,
        acceptable: f64,
    },

    /// The settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`SpcSettings`](crate::config::SpcSettings).
    #[error("failed to parse settings: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, SpcError>;
