//! Core types and definitions for the BULWARK turret controller.
//!
//! This crate defines the vocabulary shared across all other crates:
//! targets, ammunition, designations, configuration, telemetry snapshots,
//! events, and constants. It has no engine logic and no runtime framework.

pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod telemetry;
pub mod types;

pub use config::TurretConfig;
pub use error::{ConfigError, GeometryError, TurretError};
pub use types::{
    AmmunitionType, ManualWaypoint, ObstructionSample, Target, TargetDesignation, Vector3,
    VectorExt, UP,
};

#[cfg(test)]
mod tests;
