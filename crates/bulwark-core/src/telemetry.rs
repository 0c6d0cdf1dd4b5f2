//! Turret telemetry snapshot: the complete visible state handed to sinks after each tick.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{FireControlState, ShotKind, WithholdReason};
use crate::events::TurretEvent;
use crate::types::ObstructionSample;

/// Immutable per-tick snapshot of the turret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurretTelemetry {
    /// Tick counter (1 on the first update).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub time: f64,
    pub yaw_deg: f64,
    pub pitch_deg: f64,
    pub heat: f64,
    pub heat_capacity: f64,
    pub overheated: bool,
    pub power: f64,
    pub power_capacity: f64,
    pub tracked_target: Option<String>,
    /// Lead time used for the current aim (0 = no valid lead).
    pub prediction_time: f64,
    pub ammunition: String,
    pub cooldown: f64,
    /// What was fired this tick, if anything.
    pub fired_target: Option<String>,
    pub shot: Option<ShotKind>,
    pub state: FireControlState,
    /// Gate that held fire this tick, if a shot was attempted.
    pub withheld: Option<WithholdReason>,
    pub manual_override: bool,
    /// Most recent obstruction sample.
    pub obstruction: Option<ObstructionSample>,
    pub fusion: FusionSummary,
    pub tunables: Tunables,
    pub events: Vec<TurretEvent>,
}

impl TurretTelemetry {
    pub fn fired(&self) -> bool {
        self.fired_target.is_some()
    }
}

/// Aggregate view of the cooperative designation table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusionSummary {
    /// Live contributions with positive effective threat.
    pub designation_count: usize,
    pub threat_score: f64,
    /// Effective threat per sensor kind.
    pub sensor_breakdown: BTreeMap<String, f64>,
    /// Threat-weighted average confidence.
    pub average_confidence: f64,
    /// Threat-weighted average latency (seconds).
    pub average_latency: f64,
}

/// Current values of the adaptively tuned parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tunables {
    pub cooldown_scale: f64,
    pub threat_bias: f64,
    pub reward_trace: f64,
}

/// Feature vector handed to a reward source alongside the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardFeatures {
    pub heat_ratio: f64,
    pub power_ratio: f64,
    pub cooldown: f64,
    pub cooperative_threat: f64,
    pub manual_override: f64,
    pub overheated: f64,
    pub cooldown_scale: f64,
    pub threat_bias: f64,
    pub coop_confidence: f64,
    pub coop_latency: f64,
    pub ammo_damage: f64,
    pub ammo_heat: f64,
    pub ammo_speed: f64,
}

impl RewardFeatures {
    pub const LEN: usize = 13;

    /// Features in declaration order, for learners that want a flat vector.
    pub fn to_array(&self) -> [f64; Self::LEN] {
        [
            self.heat_ratio,
            self.power_ratio,
            self.cooldown,
            self.cooperative_threat,
            self.manual_override,
            self.overheated,
            self.cooldown_scale,
            self.threat_bias,
            self.coop_confidence,
            self.coop_latency,
            self.ammo_damage,
            self.ammo_heat,
            self.ammo_speed,
        ]
    }
}
