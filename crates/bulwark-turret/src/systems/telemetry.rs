//! Snapshot building. Read-only over the turret state.

use bulwark_core::config::TurretConfig;
use bulwark_core::enums::{FireControlState, ShotKind, WithholdReason};
use bulwark_core::events::TurretEvent;
use bulwark_core::telemetry::{RewardFeatures, TurretTelemetry};
use bulwark_core::types::AmmunitionType;

use crate::state::TurretState;

/// What the control branch decided this tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub state: FireControlState,
    pub fired: Option<(String, ShotKind)>,
    pub withheld: Option<WithholdReason>,
    /// The obstruction check ran this tick.
    pub obstruction_sampled: bool,
}

impl TickOutcome {
    pub fn new(state: FireControlState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn withheld(state: FireControlState, reason: WithholdReason) -> Self {
        Self {
            state,
            withheld: Some(reason),
            ..Self::default()
        }
    }

    pub fn fired(id: String, kind: ShotKind) -> Self {
        let state = match kind {
            ShotKind::Autonomous => FireControlState::ReadyToFire,
            ShotKind::ManualSingle | ShotKind::ManualBurst => FireControlState::ManualOverride,
        };
        Self {
            state,
            fired: Some((id, kind)),
            ..Self::default()
        }
    }

    pub fn with_obstruction_sampled(mut self, sampled: bool) -> Self {
        self.obstruction_sampled = sampled;
        self
    }
}

/// Build the end-of-tick snapshot.
pub fn build_telemetry(
    state: &TurretState,
    config: &TurretConfig,
    ammunition: &AmmunitionType,
    outcome: &TickOutcome,
    events: Vec<TurretEvent>,
) -> TurretTelemetry {
    let (fired_target, shot) = match &outcome.fired {
        Some((id, kind)) => (Some(id.clone()), Some(*kind)),
        None => (None, None),
    };
    TurretTelemetry {
        tick: state.tick,
        time: state.elapsed,
        yaw_deg: state.orientation.yaw_deg,
        pitch_deg: state.orientation.pitch_deg,
        heat: state.resources.heat,
        heat_capacity: config.heat_capacity,
        overheated: state.resources.overheated,
        power: state.resources.power,
        power_capacity: config.power_capacity,
        tracked_target: state.tracked_target_id().map(str::to_string),
        prediction_time: state.last_prediction_time,
        ammunition: ammunition.name.clone(),
        cooldown: state.cooldown,
        fired_target,
        shot,
        state: outcome.state,
        withheld: outcome.withheld,
        manual_override: state.manual.active,
        obstruction: state.last_obstruction,
        fusion: state.fusion.summary(),
        tunables: state.tuning.tunables(),
        events,
    }
}

/// Feature vector for the reward source.
pub fn reward_features(
    telemetry: &TurretTelemetry,
    state: &TurretState,
    config: &TurretConfig,
    ammunition: &AmmunitionType,
) -> RewardFeatures {
    let flag = |value: bool| if value { 1.0 } else { 0.0 };
    RewardFeatures {
        heat_ratio: state.resources.heat_ratio(config),
        power_ratio: state.resources.power_ratio(config),
        cooldown: telemetry.cooldown,
        cooperative_threat: telemetry.fusion.threat_score,
        manual_override: flag(telemetry.manual_override),
        overheated: flag(telemetry.overheated),
        cooldown_scale: state.tuning.cooldown_scale,
        threat_bias: state.tuning.threat_bias,
        coop_confidence: telemetry.fusion.average_confidence,
        coop_latency: telemetry.fusion.average_latency,
        ammo_damage: ammunition.damage,
        ammo_heat: ammunition.heat_per_shot,
        ammo_speed: ammunition.projectile_speed,
    }
}
