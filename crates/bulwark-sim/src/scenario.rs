//! Scenario definition for the demo harness.
//!
//! The default scenario is the classic demo: five random contacts ahead of
//! the turret, three cover spheres, an ammunition swap every 8 seconds and a
//! scripted manual override between 16 and 19 seconds.

use std::path::Path;

use serde::{Deserialize, Serialize};

use bulwark_core::config::TurretConfig;
use bulwark_core::types::{AmmunitionType, ManualWaypoint, Vector3};

use crate::error::SimError;

/// Bundled copy of the default scenario.
pub const BUNDLED_SCENARIO: &str = include_str!("../scenario.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// RNG seed. Same seed, same run.
    pub seed: u64,
    pub dt: f64,
    pub ticks: u64,
    pub turret_position: Vector3,
    /// Contacts spawned before the first tick.
    pub initial_contacts: usize,
    pub spawn: SpawnVolume,
    /// Contacts at or beyond this distance from the turret are removed.
    pub despawn_range: f64,
    /// Seconds between ammunition swaps. 0 disables cycling.
    pub ammo_cycle_interval: f64,
    pub cover: Vec<CoverSphere>,
    pub manual: ManualPlan,
    pub sensors: Option<SensorFeedConfig>,
    /// Attach the reward shaper to the turret.
    pub adaptive: bool,
    pub turret: TurretConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            dt: 0.1,
            ticks: 240,
            turret_position: Vector3::ZERO,
            initial_contacts: 5,
            spawn: SpawnVolume::default(),
            despawn_range: 100.0,
            ammo_cycle_interval: 8.0,
            cover: vec![
                CoverSphere::new(Vector3::new(5.0, 0.0, 18.0), 3.5),
                CoverSphere::new(Vector3::new(-8.0, 0.0, 25.0), 4.0),
                CoverSphere::new(Vector3::new(2.0, 0.0, 32.0), 2.5),
            ],
            manual: ManualPlan::default(),
            sensors: None,
            adaptive: false,
            turret: demo_turret(),
        }
    }
}

/// Turret tuning used by the demo.
pub fn demo_turret() -> TurretConfig {
    TurretConfig {
        max_turn_rate_deg: 240.0,
        fire_arc_deg: 4.0,
        detection_radius: 60.0,
        ammunition_types: vec![
            AmmunitionType::new("standard", 55.0, 10.0).with_heat(1.2),
            AmmunitionType::new("piercing", 70.0, 14.0).with_heat(1.8),
            AmmunitionType::new("rapid", 45.0, 6.0).with_heat(0.8),
        ],
        default_ammunition: Some("standard".into()),
        heat_capacity: 10.0,
        overheat_threshold: 7.5,
        heat_resume_threshold: 3.0,
        heat_dissipation_rate: 1.2,
        power_capacity: 12.0,
        power_per_shot: 1.5,
        power_recharge_rate: 0.8,
        ..Default::default()
    }
}

impl ScenarioConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, SimError> {
        let scenario: ScenarioConfig = toml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimError::ScenarioIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check harness parameters. Turret tuning is validated by the turret.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(invalid(format!("dt must be positive, got {}", self.dt)));
        }
        if !(self.despawn_range > 0.0) {
            return Err(invalid("despawn_range must be positive".into()));
        }
        if !(self.ammo_cycle_interval >= 0.0) {
            return Err(invalid("ammo_cycle_interval must not be negative".into()));
        }
        self.spawn.validate()?;
        if let Some(sphere) = self.cover.iter().find(|s| !(s.radius >= 0.0)) {
            return Err(invalid(format!("cover radius {} is negative", sphere.radius)));
        }
        let plan = &self.manual;
        if plan.enabled && !(plan.start <= plan.end) {
            return Err(invalid(format!(
                "manual window starts at {} after it ends at {}",
                plan.start, plan.end
            )));
        }
        if let Some(sensors) = &self.sensors {
            sensors.validate()?;
        }
        Ok(())
    }
}

fn invalid(message: String) -> SimError {
    SimError::InvalidScenario(message)
}

/// Box contacts are spawned in, with their initial motion ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnVolume {
    pub position_min: Vector3,
    pub position_max: Vector3,
    pub velocity_min: Vector3,
    pub velocity_max: Vector3,
    pub acceleration_min: Vector3,
    pub acceleration_max: Vector3,
    /// Priorities are drawn from `0..=max_priority`.
    pub max_priority: i32,
}

impl Default for SpawnVolume {
    fn default() -> Self {
        Self {
            position_min: Vector3::new(-30.0, -2.0, 20.0),
            position_max: Vector3::new(30.0, 10.0, 40.0),
            velocity_min: Vector3::new(-5.0, -1.0, -5.0),
            velocity_max: Vector3::new(5.0, 1.0, -1.0),
            acceleration_min: Vector3::new(-0.5, -0.2, -0.5),
            acceleration_max: Vector3::new(0.5, 0.0, 0.0),
            max_priority: 2,
        }
    }
}

impl SpawnVolume {
    fn validate(&self) -> Result<(), SimError> {
        let ranges = [
            ("position", self.position_min, self.position_max),
            ("velocity", self.velocity_min, self.velocity_max),
            ("acceleration", self.acceleration_min, self.acceleration_max),
        ];
        for (name, min, max) in ranges {
            if !min.is_finite() || !max.is_finite() || min.cmpgt(max).any() {
                return Err(invalid(format!("spawn {name} range {min} .. {max} is invalid")));
            }
        }
        if self.max_priority < 0 {
            return Err(invalid("spawn max_priority must not be negative".into()));
        }
        Ok(())
    }
}

/// Spherical cover object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverSphere {
    pub center: Vector3,
    pub radius: f64,
}

impl CoverSphere {
    pub fn new(center: Vector3, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// Scripted manual override window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualPlan {
    pub enabled: bool,
    /// Engage once elapsed time reaches this (seconds).
    pub start: f64,
    /// Release once elapsed time reaches this (seconds).
    pub end: f64,
    pub yaw_deg: f64,
    pub pitch_deg: f64,
    pub waypoints: Vec<ManualWaypoint>,
}

impl Default for ManualPlan {
    fn default() -> Self {
        Self {
            enabled: true,
            start: 16.0,
            end: 19.0,
            yaw_deg: 120.0,
            pitch_deg: 5.0,
            waypoints: vec![
                ManualWaypoint::new(120.0, 5.0)
                    .with_dwell(0.4)
                    .with_burst(3, 0.08),
                ManualWaypoint::new(-70.0, 3.0).with_dwell(0.5),
                ManualWaypoint::new(15.0, 0.0).with_dwell(0.6),
            ],
        }
    }
}

/// Allied sensors sharing designations with the turret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorFeedConfig {
    /// Seconds between report rounds.
    pub interval: f64,
    /// Report lifetime handed to the turret.
    pub ttl: f64,
    pub sensors: Vec<AlliedSensor>,
}

impl Default for SensorFeedConfig {
    fn default() -> Self {
        Self {
            interval: 0.5,
            ttl: 1.5,
            sensors: vec![
                AlliedSensor {
                    id: "picket-radar".into(),
                    kind: "radar".into(),
                    position: Vector3::new(0.0, 5.0, -20.0),
                    range: 90.0,
                    confidence: 0.9,
                    latency: 0.2,
                    noise: 0.1,
                },
                AlliedSensor {
                    id: "overwatch-eo".into(),
                    kind: "electro_optical".into(),
                    position: Vector3::new(25.0, 3.0, 10.0),
                    range: 50.0,
                    confidence: 0.7,
                    latency: 0.05,
                    noise: 0.25,
                },
            ],
        }
    }
}

impl SensorFeedConfig {
    fn validate(&self) -> Result<(), SimError> {
        if !(self.interval > 0.0 && self.interval.is_finite()) {
            return Err(invalid("sensor interval must be positive".into()));
        }
        if !self.ttl.is_finite() {
            return Err(invalid("sensor ttl must be finite".into()));
        }
        for sensor in &self.sensors {
            let bounded = [
                ("range", sensor.range),
                ("noise", sensor.noise),
                ("latency", sensor.latency),
            ];
            for (name, value) in bounded {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(invalid(format!(
                        "sensor '{}' {name} must be finite and non-negative, got {value}",
                        sensor.id
                    )));
                }
            }
            if !sensor.confidence.is_finite() {
                return Err(invalid(format!("sensor '{}' confidence must be finite", sensor.id)));
            }
            if !sensor.position.is_finite() {
                return Err(invalid(format!("sensor '{}' position must be finite", sensor.id)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlliedSensor {
    pub id: String,
    pub kind: String,
    pub position: Vector3,
    pub range: f64,
    pub confidence: f64,
    pub latency: f64,
    /// Relative threat noise (0 = exact).
    pub noise: f64,
}
