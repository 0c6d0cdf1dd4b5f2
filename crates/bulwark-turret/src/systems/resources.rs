//! Heat and power bookkeeping.
//!
//! Heat dissipates continuously and overheats with hysteresis: firing stops
//! at `overheat_threshold` and resumes only once heat falls to
//! `heat_resume_threshold`. Power is optional and refuses shots it cannot
//! pay for without touching any other state.

use bulwark_core::config::TurretConfig;
use bulwark_core::constants::POWER_EPSILON;
use bulwark_core::events::TurretEvent;
use tracing::info;

use crate::hooks::TurretFeedback;

/// Barrel heat and stored power.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resources {
    pub heat: f64,
    pub overheated: bool,
    pub power: f64,
}

impl Resources {
    /// Cold barrel, full power (0 when power is disabled).
    pub fn new(config: &TurretConfig) -> Self {
        Self {
            heat: 0.0,
            overheated: false,
            power: config.power_capacity.max(0.0),
        }
    }

    /// Dissipate heat and recharge power for one tick.
    ///
    /// Returns `true` when overheat cleared during this tick; the caller must
    /// hold fire for the rest of the tick.
    pub fn tick(
        &mut self,
        dt: f64,
        config: &TurretConfig,
        feedback: &mut dyn TurretFeedback,
        events: &mut Vec<TurretEvent>,
    ) -> bool {
        let previous_heat = self.heat;
        let was_overheated = self.overheated;

        self.heat = (self.heat - config.heat_dissipation_rate * dt).max(0.0);

        let mut resumed = false;
        if self.overheated && self.heat <= config.heat_resume_threshold {
            self.overheated = false;
            resumed = true;
            info!(heat = self.heat, "turret cooled down, firing resumes next tick");
            events.push(TurretEvent::CooledDown { heat: self.heat });
        }

        if self.heat != previous_heat || self.overheated != was_overheated {
            feedback.heat_changed(self.heat, config.heat_capacity, self.overheated);
        }

        if config.power_enabled() {
            let previous_power = self.power;
            self.power = (self.power + config.power_recharge_rate * dt).min(config.power_capacity);
            if self.power != previous_power {
                feedback.power_changed(self.power, config.power_capacity);
            }
        }

        resumed
    }

    /// Add one shot's heat, entering overheat at the threshold.
    pub fn apply_shot_heat(
        &mut self,
        heat_per_shot: f64,
        config: &TurretConfig,
        feedback: &mut dyn TurretFeedback,
        events: &mut Vec<TurretEvent>,
    ) {
        let previous_heat = self.heat;
        let was_overheated = self.overheated;

        self.heat = (self.heat + heat_per_shot).clamp(0.0, config.heat_capacity.max(0.0));
        if !self.overheated && self.heat >= config.overheat_threshold {
            self.overheated = true;
            info!(heat = self.heat, "turret overheated");
            events.push(TurretEvent::Overheated { heat: self.heat });
        }

        if self.heat != previous_heat || self.overheated != was_overheated {
            feedback.heat_changed(self.heat, config.heat_capacity, self.overheated);
        }
    }

    /// Pay for one shot. `false` leaves power untouched.
    pub fn consume_power(&mut self, config: &TurretConfig, feedback: &mut dyn TurretFeedback) -> bool {
        let cost = config.power_per_shot;
        if !config.power_enabled() || cost <= 0.0 {
            return true;
        }
        if self.power + POWER_EPSILON < cost {
            return false;
        }
        self.power = (self.power - cost).max(0.0);
        feedback.power_changed(self.power, config.power_capacity);
        true
    }

    /// Fraction of heat capacity in use (0 when capacity is 0).
    pub fn heat_ratio(&self, config: &TurretConfig) -> f64 {
        if config.heat_capacity > 0.0 {
            self.heat / config.heat_capacity
        } else {
            0.0
        }
    }

    /// Fraction of power capacity stored (0 when power is disabled).
    pub fn power_ratio(&self, config: &TurretConfig) -> f64 {
        if config.power_enabled() {
            self.power / config.power_capacity
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        heat: Vec<(f64, bool)>,
        power: Vec<f64>,
    }

    impl TurretFeedback for Recorder {
        fn heat_changed(&mut self, heat: f64, _capacity: f64, overheated: bool) {
            self.heat.push((heat, overheated));
        }

        fn power_changed(&mut self, power: f64, _capacity: f64) {
            self.power.push(power);
        }
    }

    fn config() -> TurretConfig {
        TurretConfig {
            heat_capacity: 10.0,
            overheat_threshold: 3.0,
            heat_resume_threshold: 1.0,
            heat_dissipation_rate: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_overheat_hysteresis() {
        let config = config();
        let mut resources = Resources::new(&config);
        let mut feedback = Recorder::default();
        let mut events = Vec::new();

        for _ in 0..3 {
            resources.apply_shot_heat(1.0, &config, &mut feedback, &mut events);
        }
        assert!(resources.overheated);
        assert_eq!(events, vec![TurretEvent::Overheated { heat: 3.0 }]);

        // 3.0 -> 2.0: still above resume threshold.
        assert!(!resources.tick(1.0, &config, &mut feedback, &mut events));
        assert!(resources.overheated);

        // 2.0 -> 1.0: clears, and reports it.
        assert!(resources.tick(1.0, &config, &mut feedback, &mut events));
        assert!(!resources.overheated);
        assert!(matches!(events.last(), Some(TurretEvent::CooledDown { .. })));
        assert_eq!(feedback.heat.last(), Some(&(1.0, false)));
    }

    #[test]
    fn test_heat_capped_and_floored() {
        let config = config();
        let mut resources = Resources::new(&config);
        let mut feedback = Recorder::default();
        let mut events = Vec::new();

        resources.apply_shot_heat(50.0, &config, &mut feedback, &mut events);
        assert_eq!(resources.heat, 10.0);
        resources.tick(100.0, &config, &mut feedback, &mut events);
        assert_eq!(resources.heat, 0.0);
    }

    #[test]
    fn test_feedback_only_on_change() {
        let config = config();
        let mut resources = Resources::new(&config);
        let mut feedback = Recorder::default();
        let mut events = Vec::new();

        resources.tick(0.1, &config, &mut feedback, &mut events);
        assert!(feedback.heat.is_empty(), "cold barrel does not change");
        assert!(feedback.power.is_empty(), "power disabled");
    }

    #[test]
    fn test_power_refusal_has_no_side_effects() {
        let config = TurretConfig {
            power_capacity: 2.0,
            power_per_shot: 1.5,
            power_recharge_rate: 0.5,
            ..Default::default()
        };
        let mut resources = Resources::new(&config);
        let mut feedback = Recorder::default();

        assert!(resources.consume_power(&config, &mut feedback));
        assert!((resources.power - 0.5).abs() < 1e-12);
        assert!(!resources.consume_power(&config, &mut feedback));
        assert!((resources.power - 0.5).abs() < 1e-12);
        assert_eq!(feedback.power.len(), 1);

        let mut events = Vec::new();
        resources.tick(10.0, &config, &mut feedback, &mut events);
        assert_eq!(resources.power, 2.0);
    }

    #[test]
    fn test_free_shots_when_power_disabled() {
        let config = TurretConfig {
            power_per_shot: 5.0,
            ..Default::default()
        };
        let mut resources = Resources::new(&config);
        assert!(resources.consume_power(&config, &mut Recorder::default()));
        assert_eq!(resources.power, 0.0);
    }
}
