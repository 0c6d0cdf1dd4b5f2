use std::path::PathBuf;

use thiserror::Error;

use bulwark_core::error::{ConfigError, TurretError};

/// Errors raised while setting up or running a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Turret(#[from] TurretError),
    #[error("failed to read scenario {}: {source}", .path.display())]
    ScenarioIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario: {0}")]
    ScenarioParse(#[from] toml::de::Error),
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
    #[error("failed to open telemetry output {}: {source}", .path.display())]
    TelemetryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
