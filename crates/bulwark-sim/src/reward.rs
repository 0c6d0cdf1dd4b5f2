//! Hand-shaped reward signal for the adaptive tuning loop.

use serde::{Deserialize, Serialize};

use bulwark_core::enums::{FireControlState, WithholdReason};
use bulwark_core::telemetry::{RewardFeatures, TurretTelemetry};
use bulwark_turret::hooks::RewardSource;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardShaper {
    /// Paid for every shot, scaled by ammunition damage / 10.
    pub fire_bonus: f64,
    /// Multiplied by the heat ratio every tick.
    pub heat_penalty: f64,
    pub overheat_penalty: f64,
    /// Charged when a shot was withheld by cover.
    pub obstruction_penalty: f64,
    /// Charged while idle with allied threat reported.
    pub idle_threat_penalty: f64,
}

impl Default for RewardShaper {
    fn default() -> Self {
        Self {
            fire_bonus: 1.0,
            heat_penalty: 0.3,
            overheat_penalty: 1.0,
            obstruction_penalty: 0.2,
            idle_threat_penalty: 0.1,
        }
    }
}

impl RewardShaper {
    pub fn score(&self, telemetry: &TurretTelemetry, features: &RewardFeatures) -> f64 {
        let mut reward = 0.0;
        if telemetry.fired() {
            reward += self.fire_bonus * features.ammo_damage / 10.0;
        }
        reward -= self.heat_penalty * features.heat_ratio;
        reward -= self.overheat_penalty * features.overheated;
        if telemetry.withheld == Some(WithholdReason::Obstructed) {
            reward -= self.obstruction_penalty;
        }
        if telemetry.state == FireControlState::Idle && features.cooperative_threat > 0.0 {
            reward -= self.idle_threat_penalty * features.cooperative_threat;
        }
        reward
    }
}

impl RewardSource for RewardShaper {
    fn reward(&mut self, telemetry: &TurretTelemetry, features: &RewardFeatures) -> Option<f64> {
        Some(self.score(telemetry, features))
    }
}
