//! Error types. Only programmer/configuration mistakes are errors; fire
//! gating outcomes are reported through telemetry instead.

use std::path::PathBuf;

use thiserror::Error;

/// Degenerate geometry that would otherwise propagate NaNs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("cannot normalize a zero-length vector")]
    ZeroLengthVector,
}

/// Errors raised by turret construction and catalog operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TurretError {
    #[error("unknown ammunition type '{0}'")]
    UnknownAmmunition(String),
    #[error("ammunition catalog must contain at least one ammunition type")]
    EmptyAmmunitionCatalog,
    #[error("invalid turret configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] TurretError),
}
