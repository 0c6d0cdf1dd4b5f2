//! Reward-driven retuning of fire cooldown and threat bias.

use bulwark_core::config::TurretConfig;
use bulwark_core::telemetry::Tunables;

/// Adaptive tunables plus the smoothed reward trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveTuning {
    pub cooldown_scale: f64,
    pub threat_bias: f64,
    pub reward_trace: f64,
    seeded: bool,
}

impl AdaptiveTuning {
    pub fn new(config: &TurretConfig) -> Self {
        Self {
            cooldown_scale: clamp_to(1.0, config.rl_cooldown_bounds),
            threat_bias: clamp_to(1.0, config.rl_threat_bias_bounds),
            reward_trace: config.rl_reward_target,
            seeded: false,
        }
    }

    /// Fold one finite reward into the trace and nudge the tunables toward
    /// the reward target. Non-finite rewards are ignored.
    pub fn apply_reward(&mut self, reward: f64, config: &TurretConfig) {
        if !reward.is_finite() {
            return;
        }
        let alpha = config.rl_reward_smoothing.clamp(0.0, 1.0);
        if !self.seeded || alpha <= 0.0 {
            self.reward_trace = reward;
            self.seeded = true;
        } else {
            self.reward_trace = (1.0 - alpha) * self.reward_trace + alpha * reward;
        }

        let rate = config.rl_reward_adjust_rate;
        if !(rate > 0.0) {
            return;
        }
        let deviation = self.reward_trace - config.rl_reward_target;
        self.cooldown_scale = clamp_to(
            self.cooldown_scale - deviation * rate,
            config.rl_cooldown_bounds,
        );
        self.threat_bias = clamp_to(
            self.threat_bias + deviation * rate,
            config.rl_threat_bias_bounds,
        );
    }

    pub fn tunables(&self) -> Tunables {
        Tunables {
            cooldown_scale: self.cooldown_scale,
            threat_bias: self.threat_bias,
            reward_trace: self.reward_trace,
        }
    }
}

fn clamp_to(value: f64, (low, high): (f64, f64)) -> f64 {
    value.max(low).min(high)
}
