//! Turret tuning bundle and its TOML loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ConfigError, TurretError};
use crate::types::AmmunitionType;

/// Configuration tuning the turret's responsiveness, resources and
/// adaptive loop. Built once and never mutated by the turret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurretConfig {
    pub max_turn_rate_deg: f64,
    pub max_elevation_deg: f64,
    pub min_elevation_deg: f64,
    /// Alignment tolerance on both axes (degrees).
    pub fire_arc_deg: f64,
    /// Speed of the synthesized ammunition when the catalog is empty.
    pub projectile_speed: f64,
    pub detection_radius: f64,
    /// Seconds before forgetting a lost target.
    pub target_memory: f64,
    pub max_prediction_time: f64,
    pub fire_cooldown: f64,
    pub ammunition_types: Vec<AmmunitionType>,
    pub default_ammunition: Option<String>,

    // --- Heat ---
    pub heat_capacity: f64,
    pub overheat_threshold: f64,
    pub heat_resume_threshold: f64,
    pub heat_dissipation_rate: f64,

    // --- Idle scan ---
    pub idle_scan_speed_deg: f64,
    pub idle_scan_yaw_range_deg: f64,
    pub idle_scan_pitch_deg: f64,

    // --- Power (disabled when capacity is 0) ---
    pub power_capacity: f64,
    pub power_per_shot: f64,
    pub power_recharge_rate: f64,

    // --- Cooperative fusion ---
    pub cooperative_threat_weight: f64,
    pub cooperative_latency_decay: f64,
    pub cooperative_confidence_exponent: f64,

    // --- Adaptive reward loop ---
    pub rl_reward_target: f64,
    pub rl_reward_adjust_rate: f64,
    pub rl_reward_smoothing: f64,
    pub rl_cooldown_bounds: (f64, f64),
    pub rl_threat_bias_bounds: (f64, f64),
}

impl Default for TurretConfig {
    fn default() -> Self {
        Self {
            max_turn_rate_deg: DEFAULT_MAX_TURN_RATE_DEG,
            max_elevation_deg: DEFAULT_MAX_ELEVATION_DEG,
            min_elevation_deg: DEFAULT_MIN_ELEVATION_DEG,
            fire_arc_deg: DEFAULT_FIRE_ARC_DEG,
            projectile_speed: DEFAULT_PROJECTILE_SPEED,
            detection_radius: DEFAULT_DETECTION_RADIUS,
            target_memory: DEFAULT_TARGET_MEMORY,
            max_prediction_time: DEFAULT_MAX_PREDICTION_TIME,
            fire_cooldown: DEFAULT_FIRE_COOLDOWN,
            ammunition_types: Vec::new(),
            default_ammunition: None,
            heat_capacity: DEFAULT_HEAT_CAPACITY,
            overheat_threshold: DEFAULT_OVERHEAT_THRESHOLD,
            heat_resume_threshold: DEFAULT_HEAT_RESUME_THRESHOLD,
            heat_dissipation_rate: DEFAULT_HEAT_DISSIPATION_RATE,
            idle_scan_speed_deg: DEFAULT_IDLE_SCAN_SPEED_DEG,
            idle_scan_yaw_range_deg: DEFAULT_IDLE_SCAN_YAW_RANGE_DEG,
            idle_scan_pitch_deg: DEFAULT_IDLE_SCAN_PITCH_DEG,
            power_capacity: 0.0,
            power_per_shot: 0.0,
            power_recharge_rate: 0.0,
            cooperative_threat_weight: DEFAULT_COOPERATIVE_THREAT_WEIGHT,
            cooperative_latency_decay: DEFAULT_COOPERATIVE_LATENCY_DECAY,
            cooperative_confidence_exponent: DEFAULT_COOPERATIVE_CONFIDENCE_EXPONENT,
            rl_reward_target: DEFAULT_RL_REWARD_TARGET,
            rl_reward_adjust_rate: DEFAULT_RL_REWARD_ADJUST_RATE,
            rl_reward_smoothing: DEFAULT_RL_REWARD_SMOOTHING,
            rl_cooldown_bounds: DEFAULT_RL_COOLDOWN_BOUNDS,
            rl_threat_bias_bounds: DEFAULT_RL_THREAT_BIAS_BOUNDS,
        }
    }
}

impl TurretConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: TurretConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Whether the power subsystem is active.
    pub fn power_enabled(&self) -> bool {
        self.power_capacity > 0.0
    }

    /// Reject values that would break the turret's clamps and invariants.
    pub fn validate(&self) -> Result<(), TurretError> {
        let finite = [
            ("max_turn_rate_deg", self.max_turn_rate_deg),
            ("max_elevation_deg", self.max_elevation_deg),
            ("min_elevation_deg", self.min_elevation_deg),
            ("fire_arc_deg", self.fire_arc_deg),
            ("projectile_speed", self.projectile_speed),
            ("detection_radius", self.detection_radius),
            ("target_memory", self.target_memory),
            ("max_prediction_time", self.max_prediction_time),
            ("fire_cooldown", self.fire_cooldown),
            ("heat_capacity", self.heat_capacity),
            ("overheat_threshold", self.overheat_threshold),
            ("heat_resume_threshold", self.heat_resume_threshold),
            ("heat_dissipation_rate", self.heat_dissipation_rate),
            ("idle_scan_speed_deg", self.idle_scan_speed_deg),
            ("idle_scan_yaw_range_deg", self.idle_scan_yaw_range_deg),
            ("idle_scan_pitch_deg", self.idle_scan_pitch_deg),
            ("power_capacity", self.power_capacity),
            ("power_per_shot", self.power_per_shot),
            ("power_recharge_rate", self.power_recharge_rate),
            ("cooperative_threat_weight", self.cooperative_threat_weight),
            ("cooperative_latency_decay", self.cooperative_latency_decay),
            ("cooperative_confidence_exponent", self.cooperative_confidence_exponent),
            ("rl_reward_target", self.rl_reward_target),
            ("rl_reward_adjust_rate", self.rl_reward_adjust_rate),
            ("rl_reward_smoothing", self.rl_reward_smoothing),
            ("rl_cooldown_bounds.0", self.rl_cooldown_bounds.0),
            ("rl_cooldown_bounds.1", self.rl_cooldown_bounds.1),
            ("rl_threat_bias_bounds.0", self.rl_threat_bias_bounds.0),
            ("rl_threat_bias_bounds.1", self.rl_threat_bias_bounds.1),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return Err(invalid(format!("{name} must be finite")));
        }

        let non_negative = [
            ("max_turn_rate_deg", self.max_turn_rate_deg),
            ("fire_arc_deg", self.fire_arc_deg),
            ("detection_radius", self.detection_radius),
            ("target_memory", self.target_memory),
            ("max_prediction_time", self.max_prediction_time),
            ("heat_capacity", self.heat_capacity),
            ("heat_resume_threshold", self.heat_resume_threshold),
            ("heat_dissipation_rate", self.heat_dissipation_rate),
            ("power_capacity", self.power_capacity),
            ("power_recharge_rate", self.power_recharge_rate),
        ];
        if let Some((name, _)) = non_negative.iter().find(|(_, value)| *value < 0.0) {
            return Err(invalid(format!("{name} must not be negative")));
        }

        if self.min_elevation_deg > self.max_elevation_deg {
            return Err(invalid(format!(
                "min_elevation_deg {} exceeds max_elevation_deg {}",
                self.min_elevation_deg, self.max_elevation_deg
            )));
        }
        if self.overheat_threshold > self.heat_capacity {
            return Err(invalid(format!(
                "overheat_threshold {} exceeds heat_capacity {}",
                self.overheat_threshold, self.heat_capacity
            )));
        }
        if self.heat_resume_threshold > self.overheat_threshold {
            return Err(invalid(format!(
                "heat_resume_threshold {} exceeds overheat_threshold {}",
                self.heat_resume_threshold, self.overheat_threshold
            )));
        }
        let (cd_min, cd_max) = self.rl_cooldown_bounds;
        if cd_min > cd_max {
            return Err(invalid(format!(
                "rl_cooldown_bounds ({cd_min}, {cd_max}) are inverted"
            )));
        }
        let (bias_min, bias_max) = self.rl_threat_bias_bounds;
        if bias_min > bias_max {
            return Err(invalid(format!(
                "rl_threat_bias_bounds ({bias_min}, {bias_max}) are inverted"
            )));
        }

        for ammo in &self.ammunition_types {
            if !ammo.projectile_speed.is_finite() || !ammo.heat_per_shot.is_finite() {
                return Err(invalid(format!(
                    "ammunition '{}' has non-finite characteristics",
                    ammo.name
                )));
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> TurretError {
    TurretError::InvalidConfig(message)
}
