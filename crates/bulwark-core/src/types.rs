//! Fundamental geometric and engagement types.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// 3D vector in simulation space (meters). `y` is up; yaw is measured
/// from `+z` toward `+x`.
pub type Vector3 = glam::DVec3;

/// World up axis.
pub const UP: Vector3 = glam::DVec3::Y;

/// Geometry helpers the turret needs on top of `glam`.
pub trait VectorExt {
    /// Unit vector in the same direction. Fails on a zero-length vector
    /// instead of producing NaNs.
    fn normalized(self) -> Result<Vector3, GeometryError>;

    /// Angle in radians between the projections of both vectors on the XZ plane.
    fn horizontal_angle_to(self, other: Vector3) -> f64;

    /// Angle in radians between the elevation profiles of both vectors.
    fn vertical_angle_to(self, other: Vector3) -> f64;
}

impl VectorExt for Vector3 {
    fn normalized(self) -> Result<Vector3, GeometryError> {
        let magnitude = self.length();
        if magnitude == 0.0 || !magnitude.is_finite() {
            return Err(GeometryError::ZeroLengthVector);
        }
        Ok(self / magnitude)
    }

    fn horizontal_angle_to(self, other: Vector3) -> f64 {
        angle_between(self - UP * self.dot(UP), other - UP * other.dot(UP))
    }

    fn vertical_angle_to(self, other: Vector3) -> f64 {
        let a = Vector3::new(0.0, self.dot(UP), self.length());
        let b = Vector3::new(0.0, other.dot(UP), other.length());
        angle_between(a, b)
    }
}

/// Angle between two vectors, 0 when either is degenerate.
fn angle_between(a: Vector3, b: Vector3) -> f64 {
    let denom = a.length() * b.length();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

/// An enemy actor observed this tick. Owned by the caller; the turret only
/// reads it and extrapolates along its velocity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub position: Vector3,
    pub velocity: Vector3,
    #[serde(default)]
    pub is_airborne: bool,
    #[serde(default)]
    pub priority: i32,
}

impl Target {
    pub fn new(id: impl Into<String>, position: Vector3, velocity: Vector3) -> Self {
        Self {
            id: id.into(),
            position,
            velocity,
            is_airborne: false,
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn airborne(mut self, is_airborne: bool) -> Self {
        self.is_airborne = is_airborne;
        self
    }

    /// Position after `time` seconds of constant-velocity motion.
    pub fn predict_position(&self, time: f64) -> Vector3 {
        self.position + self.velocity * time
    }
}

/// Projectile characteristics for one entry of the ammunition catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmmunitionType {
    pub name: String,
    /// Muzzle speed (m/s).
    pub projectile_speed: f64,
    pub damage: f64,
    /// Heat added to the barrel per shot.
    #[serde(default = "default_heat_per_shot")]
    pub heat_per_shot: f64,
}

fn default_heat_per_shot() -> f64 {
    1.0
}

impl AmmunitionType {
    pub fn new(name: impl Into<String>, projectile_speed: f64, damage: f64) -> Self {
        Self {
            name: name.into(),
            projectile_speed,
            damage,
            heat_per_shot: default_heat_per_shot(),
        }
    }

    pub fn with_heat(mut self, heat_per_shot: f64) -> Self {
        self.heat_per_shot = heat_per_shot;
        self
    }
}

/// Result of an external line-of-sight query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstructionSample {
    pub blocked: bool,
    pub hit_position: Option<Vector3>,
    pub surface_normal: Option<Vector3>,
    #[serde(default)]
    pub navigation_cost: f64,
}

impl ObstructionSample {
    pub fn clear() -> Self {
        Self::default()
    }

    pub fn blocked_at(hit_position: Vector3) -> Self {
        Self {
            blocked: true,
            hit_position: Some(hit_position),
            ..Self::default()
        }
    }
}

/// A plain line-of-sight answer: `true` means the path is clear.
impl From<bool> for ObstructionSample {
    fn from(line_of_sight: bool) -> Self {
        Self {
            blocked: !line_of_sight,
            ..Self::default()
        }
    }
}

/// Scripted manual-override orientation with optional burst fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualWaypoint {
    pub yaw_deg: f64,
    pub pitch_deg: f64,
    /// Seconds to hold once aligned before advancing.
    pub dwell_time: f64,
    /// Shots to fire once aligned (0 = none).
    pub fire_burst: u32,
    /// Seconds between burst shots.
    pub burst_interval: f64,
}

impl Default for ManualWaypoint {
    fn default() -> Self {
        Self {
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            dwell_time: 0.5,
            fire_burst: 0,
            burst_interval: 0.1,
        }
    }
}

impl ManualWaypoint {
    pub fn new(yaw_deg: f64, pitch_deg: f64) -> Self {
        Self {
            yaw_deg,
            pitch_deg,
            ..Self::default()
        }
    }

    pub fn with_dwell(mut self, dwell_time: f64) -> Self {
        self.dwell_time = dwell_time;
        self
    }

    pub fn with_burst(mut self, fire_burst: u32, burst_interval: f64) -> Self {
        self.fire_burst = fire_burst;
        self.burst_interval = burst_interval;
        self
    }
}

/// Threat report about a target, shared by an allied sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetDesignation {
    pub target_id: String,
    pub threat: f64,
    /// Seconds the report stays relevant.
    pub ttl: f64,
    /// Reports from the same sensor replace each other; `None` never does.
    pub sensor_id: Option<String>,
    pub sensor_kind: String,
    /// Threat lost per second. Defaults to fading out over the lifetime.
    pub decay_rate: Option<f64>,
    /// 0.0 - 1.0.
    pub confidence: f64,
    /// Age of the report when it arrives (seconds).
    pub latency: f64,
}

impl Default for TargetDesignation {
    fn default() -> Self {
        Self {
            target_id: String::new(),
            threat: 0.0,
            ttl: 2.0,
            sensor_id: None,
            sensor_kind: "generic".to_string(),
            decay_rate: None,
            confidence: 1.0,
            latency: 0.0,
        }
    }
}

impl TargetDesignation {
    pub fn new(target_id: impl Into<String>, threat: f64) -> Self {
        Self {
            target_id: target_id.into(),
            threat,
            ..Self::default()
        }
    }

    pub fn from_sensor(mut self, sensor_id: impl Into<String>, sensor_kind: impl Into<String>) -> Self {
        self.sensor_id = Some(sensor_id.into());
        self.sensor_kind = sensor_kind.into();
        self
    }

    pub fn with_ttl(mut self, ttl: f64) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_quality(mut self, confidence: f64, latency: f64) -> Self {
        self.confidence = confidence;
        self.latency = latency;
        self
    }

    pub fn with_decay_rate(mut self, decay_rate: f64) -> Self {
        self.decay_rate = Some(decay_rate);
        self
    }
}
