//! The turret controller.
//!
//! `Turret` owns its configuration, ammunition catalog, mutable state and
//! injected collaborators. One call to [`Turret::update`] runs a whole tick:
//!
//! 1. advance clock and tick counter, decay cooldown
//! 2. dissipate heat, recharge power
//! 3. decay fused designations
//! 4. manual sub-machine, or lock refresh / selection / idle scan
//! 5. intercept, rotate, evaluate fire gates, fire
//! 6. build telemetry, dispatch to sinks and effects
//! 7. feed the reward source into the adaptive loop

use bulwark_core::config::TurretConfig;
use bulwark_core::constants::*;
use bulwark_core::enums::{FireControlState, ShotKind, WithholdReason};
use bulwark_core::error::TurretError;
use bulwark_core::events::TurretEvent;
use bulwark_core::telemetry::TurretTelemetry;
use bulwark_core::types::{AmmunitionType, ManualWaypoint, Target, TargetDesignation, Vector3};
use tracing::{debug, info, warn};

use crate::ballistics::{aim_angles, solve_intercept_time};
use crate::hooks::{
    EffectsSink, NoFeedback, ObstructionCheck, OrientationBlend, RewardSource, TelemetrySink,
    TurretFeedback,
};
use crate::state::TurretState;
use crate::systems::acquisition::{self, LockStatus, TrackLock};
use crate::systems::fire_control::{self, Orientation};
use crate::systems::fusion::FusionWeights;
use crate::systems::telemetry::{self, TickOutcome};

/// Autonomous turret controller.
pub struct Turret {
    position: Vector3,
    config: TurretConfig,
    ammunition: Vec<AmmunitionType>,
    state: TurretState,

    obstruction: Option<Box<dyn ObstructionCheck>>,
    blend: Option<Box<dyn OrientationBlend>>,
    feedback: Box<dyn TurretFeedback>,
    sinks: Vec<Box<dyn TelemetrySink>>,
    effects: Option<Box<dyn EffectsSink>>,
    reward: Option<Box<dyn RewardSource>>,

    /// Events raised between ticks, drained into the next snapshot. Holds
    /// at most one event of each kind; a repeat replaces the earlier one.
    pending_events: Vec<TurretEvent>,
    last_telemetry: Option<TurretTelemetry>,
}

impl Turret {
    /// Validate `config`, resolve the ammunition catalog and start cold,
    /// fully powered, facing `+z`.
    pub fn new(position: Vector3, config: TurretConfig) -> Result<Self, TurretError> {
        config.validate()?;
        let ammunition = resolve_catalog(&config)?;
        let ammunition_index = match &config.default_ammunition {
            Some(name) => ammunition
                .iter()
                .position(|ammo| &ammo.name == name)
                .ok_or_else(|| TurretError::UnknownAmmunition(name.clone()))?,
            None => 0,
        };
        let state = TurretState::new(&config, ammunition_index);

        Ok(Self {
            position,
            config,
            ammunition,
            state,
            obstruction: None,
            blend: None,
            feedback: Box::new(NoFeedback),
            sinks: Vec::new(),
            effects: None,
            reward: None,
            pending_events: Vec::new(),
            last_telemetry: None,
        })
    }

    // --- Collaborators ---

    pub fn with_obstruction_check(mut self, check: impl ObstructionCheck + 'static) -> Self {
        self.set_obstruction_check(check);
        self
    }

    /// Replace the obstruction check at runtime.
    pub fn set_obstruction_check(&mut self, check: impl ObstructionCheck + 'static) {
        self.obstruction = Some(Box::new(check));
    }

    pub fn with_orientation_blend(mut self, blend: impl OrientationBlend + 'static) -> Self {
        self.blend = Some(Box::new(blend));
        self
    }

    pub fn with_feedback(mut self, feedback: impl TurretFeedback + 'static) -> Self {
        self.feedback = Box::new(feedback);
        self
    }

    /// Append a telemetry sink. Sinks receive snapshots in registration order.
    pub fn add_telemetry_sink(&mut self, sink: impl TelemetrySink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn with_telemetry_sink(mut self, sink: impl TelemetrySink + 'static) -> Self {
        self.add_telemetry_sink(sink);
        self
    }

    pub fn with_effects(mut self, effects: impl EffectsSink + 'static) -> Self {
        self.effects = Some(Box::new(effects));
        self
    }

    pub fn with_reward_source(mut self, source: impl RewardSource + 'static) -> Self {
        self.reward = Some(Box::new(source));
        self
    }

    /// Close every telemetry sink.
    pub fn close_sinks(&mut self) {
        for sink in &mut self.sinks {
            sink.close();
        }
    }

    // --- Accessors ---

    pub fn state(&self) -> &TurretState {
        &self.state
    }

    pub fn config(&self) -> &TurretConfig {
        &self.config
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn last_telemetry(&self) -> Option<&TurretTelemetry> {
        self.last_telemetry.as_ref()
    }

    pub fn ammunition_catalog(&self) -> &[AmmunitionType] {
        &self.ammunition
    }

    pub fn current_ammunition(&self) -> &AmmunitionType {
        &self.ammunition[self.state.ammunition_index]
    }

    // --- Ammunition ---

    /// Switch to the named ammunition.
    pub fn set_ammunition(&mut self, name: &str) -> Result<&AmmunitionType, TurretError> {
        let index = self
            .ammunition
            .iter()
            .position(|ammo| ammo.name == name)
            .ok_or_else(|| TurretError::UnknownAmmunition(name.to_string()))?;
        self.select_ammunition(index);
        Ok(self.current_ammunition())
    }

    /// Advance to the next catalog entry, wrapping around.
    pub fn cycle_ammunition(&mut self) -> &AmmunitionType {
        let next = (self.state.ammunition_index + 1) % self.ammunition.len();
        self.select_ammunition(next);
        self.current_ammunition()
    }

    fn select_ammunition(&mut self, index: usize) {
        if index == self.state.ammunition_index {
            return;
        }
        self.state.ammunition_index = index;
        let name = self.ammunition[index].name.clone();
        info!(ammunition = %name, "ammunition changed");
        self.queue_event(TurretEvent::AmmunitionChanged { name });
    }

    fn queue_event(&mut self, event: TurretEvent) {
        let kind = std::mem::discriminant(&event);
        self.pending_events
            .retain(|queued| std::mem::discriminant(queued) != kind);
        self.pending_events.push(event);
    }

    // --- Cooperative designations ---

    /// Merge allied threat reports into the fusion table.
    pub fn ingest_designations<'a>(
        &mut self,
        designations: impl IntoIterator<Item = &'a TargetDesignation>,
    ) {
        let weights = FusionWeights::from(&self.config);
        self.state.fusion.ingest(designations, weights);
    }

    /// Best candidate under the current threat bias and fused threats.
    /// Does not change the lock.
    pub fn select_target<'a>(&self, candidates: &'a [Target]) -> Option<&'a Target> {
        acquisition::select_target(
            candidates,
            self.position,
            &self.config,
            self.state.tuning.threat_bias,
            &self.state.fusion,
        )
    }

    // --- Manual override ---

    /// Take manual control aimed at (`yaw_deg`, `pitch_deg`), replacing any
    /// queued script with `waypoints`. Drops the autonomous lock.
    pub fn engage_manual_override(
        &mut self,
        yaw_deg: f64,
        pitch_deg: f64,
        waypoints: impl IntoIterator<Item = ManualWaypoint>,
    ) {
        self.state.manual.engage(
            Orientation::new(yaw_deg, pitch_deg),
            waypoints,
            &self.config,
        );
        self.state.lock = None;
        self.state.last_prediction_time = 0.0;
        let queued = self.state.manual.waypoints.len();
        info!(waypoints = queued, "manual override engaged");
        self.queue_event(TurretEvent::ManualOverrideEngaged { waypoints: queued });
    }

    /// Return to autonomous control.
    pub fn clear_manual_override(&mut self) {
        if !self.state.manual.active {
            return;
        }
        self.state.manual.clear();
        info!("manual override cleared");
        self.queue_event(TurretEvent::ManualOverrideCleared);
    }

    /// Ask for one shot at the current manual aim. Consumed by the next
    /// manual tick whether or not it fires.
    pub fn request_manual_fire(&mut self) {
        self.state.manual.request_fire();
    }

    pub fn queue_manual_waypoint(&mut self, waypoint: ManualWaypoint) {
        self.state.manual.queue(waypoint);
    }

    // --- Adaptive loop ---

    /// Feed one reward into the adaptive loop.
    pub fn apply_rl_reward(&mut self, reward: f64) {
        if !reward.is_finite() {
            warn!(reward, "ignoring non-finite reward");
            return;
        }
        self.state.tuning.apply_reward(reward, &self.config);
    }

    // --- Tick ---

    /// Advance one tick of `dt` seconds against this tick's observations.
    ///
    /// Returns the fired target's id, [`MANUAL_SHOT_ID`] or
    /// [`MANUAL_BURST_ID`] for manual shots, or `None` when nothing fired.
    pub fn update(&mut self, dt: f64, targets: &[Target]) -> Option<String> {
        let dt = if dt >= 0.0 {
            dt
        } else {
            warn!(dt, "negative time step treated as zero");
            0.0
        };
        let mut events = std::mem::take(&mut self.pending_events);

        self.state.tick += 1;
        self.state.elapsed += dt;
        self.state.cooldown = (self.state.cooldown - dt).max(0.0);
        let resumed = self.state.resources.tick(
            dt,
            &self.config,
            self.feedback.as_mut(),
            &mut events,
        );
        self.state.fusion.decay(dt);

        let outcome = if self.state.manual.active {
            self.manual_tick(dt, resumed, &mut events)
        } else {
            self.autonomous_tick(dt, targets, resumed, &mut events)
        };

        self.finish_tick(outcome, events)
    }

    fn autonomous_tick(
        &mut self,
        dt: f64,
        targets: &[Target],
        resumed: bool,
        events: &mut Vec<TurretEvent>,
    ) -> TickOutcome {
        let lost = match self.state.lock.as_mut() {
            Some(lock) => {
                let status =
                    acquisition::refresh_lock(lock, targets, self.position, dt, &self.config);
                (status == LockStatus::Lost).then(|| lock.target_id().to_string())
            }
            None => None,
        };
        if let Some(target_id) = lost {
            debug!(target_id = %target_id, "target lost");
            self.state.lock = None;
            events.push(TurretEvent::TargetLost { target_id });
        }

        if self.state.lock.is_none() {
            if let Some(target) = self.select_target(targets).cloned() {
                debug!(target_id = %target.id, "target acquired");
                events.push(TurretEvent::TargetAcquired {
                    target_id: target.id.clone(),
                });
                self.state.lock = Some(TrackLock::new(target));
            }
        }

        let Some(target) = self.state.tracked_target().cloned() else {
            self.idle_scan(dt);
            return TickOutcome::new(FireControlState::Idle);
        };

        let speed = self.current_ammunition().projectile_speed;
        let lead = solve_intercept_time(
            self.position,
            target.position,
            target.velocity,
            speed,
            Some(self.config.max_prediction_time),
        );
        self.state.last_prediction_time = lead;
        let aim_point = target.predict_position(lead);
        let desired = match aim_angles(self.position, aim_point) {
            Some((yaw, pitch)) => Orientation::new(yaw, pitch).clamped(&self.config),
            None => self.state.orientation,
        };
        self.state.orientation = fire_control::rotate_toward(
            self.state.orientation,
            desired,
            dt,
            &self.config,
            self.blend.as_deref_mut(),
        );

        let tracking = |reason| TickOutcome::withheld(FireControlState::Tracking, reason);

        if !self
            .state
            .orientation
            .aligned_with(desired, self.config.fire_arc_deg)
        {
            return tracking(WithholdReason::Misaligned);
        }
        if let Err(reason) = fire_control::readiness(
            self.state.cooldown,
            self.state.resources.overheated,
            resumed,
        ) {
            return tracking(reason);
        }

        let mut sampled = false;
        if let Some(check) = self.obstruction.as_mut() {
            let sample = check.check(self.position, aim_point);
            sampled = true;
            self.state.last_obstruction = Some(sample);
            self.feedback.obstruction_sampled(&sample);
            if sample.blocked {
                debug!(target_id = %target.id, "line of sight blocked");
                events.push(TurretEvent::LineOfSightBlocked {
                    hit_position: sample.hit_position,
                });
                return tracking(WithholdReason::Obstructed).with_obstruction_sampled(true);
            }
        }

        if !self
            .state
            .resources
            .consume_power(&self.config, self.feedback.as_mut())
        {
            return tracking(WithholdReason::InsufficientPower).with_obstruction_sampled(sampled);
        }

        self.discharge(target.id, ShotKind::Autonomous, events)
            .with_obstruction_sampled(sampled)
    }

    fn idle_scan(&mut self, dt: f64) {
        self.state.idle_time += dt;
        self.state.last_prediction_time = 0.0;
        let (yaw, pitch) = acquisition::idle_scan_angles(self.state.idle_time, &self.config);
        self.state.orientation = fire_control::rotate_toward(
            self.state.orientation,
            Orientation::new(yaw, pitch).clamped(&self.config),
            dt,
            &self.config,
            self.blend.as_deref_mut(),
        );
    }

    fn manual_tick(&mut self, dt: f64, resumed: bool, events: &mut Vec<TurretEvent>) -> TickOutcome {
        self.state.lock = None;
        self.state.last_prediction_time = 0.0;

        let start = self.state.orientation;
        self.state.manual.advance(start, dt, &self.config, events);
        let aim = self.state.manual.aim;
        self.state.orientation = fire_control::rotate_toward(
            start,
            aim,
            dt,
            &self.config,
            self.blend.as_deref_mut(),
        );
        self.state.manual.tick_burst(dt);

        let requested = self.state.manual.take_request();
        let burst_due = self.state.manual.burst_ready();
        if !requested && !burst_due {
            return TickOutcome::new(FireControlState::ManualOverride);
        }

        let manual = |reason| TickOutcome::withheld(FireControlState::ManualOverride, reason);
        if let Err(reason) = fire_control::readiness(
            self.state.cooldown,
            self.state.resources.overheated,
            resumed,
        ) {
            return manual(reason);
        }
        if !self
            .state
            .orientation
            .aligned_with(aim, self.config.fire_arc_deg)
        {
            return manual(WithholdReason::Misaligned);
        }
        if !self
            .state
            .resources
            .consume_power(&self.config, self.feedback.as_mut())
        {
            return manual(WithholdReason::InsufficientPower);
        }

        if requested {
            self.discharge(MANUAL_SHOT_ID.to_string(), ShotKind::ManualSingle, events)
        } else {
            self.state.manual.burst_fired();
            self.discharge(MANUAL_BURST_ID.to_string(), ShotKind::ManualBurst, events)
        }
    }

    /// Commit a shot that passed every gate: heat, cooldown, event.
    fn discharge(&mut self, id: String, kind: ShotKind, events: &mut Vec<TurretEvent>) -> TickOutcome {
        let ammo = &self.ammunition[self.state.ammunition_index];
        self.state.resources.apply_shot_heat(
            ammo.heat_per_shot,
            &self.config,
            self.feedback.as_mut(),
            events,
        );
        self.state.cooldown =
            fire_control::fire_cooldown(self.config.fire_cooldown, self.state.tuning.cooldown_scale);

        debug!(target_id = %id, ?kind, ammunition = %ammo.name, "fired");
        events.push(TurretEvent::Fired {
            target_id: id.clone(),
            kind,
            ammunition: ammo.name.clone(),
        });
        TickOutcome::fired(id, kind)
    }

    fn finish_tick(&mut self, outcome: TickOutcome, events: Vec<TurretEvent>) -> Option<String> {
        let ammo = &self.ammunition[self.state.ammunition_index];
        let snapshot = telemetry::build_telemetry(&self.state, &self.config, ammo, &outcome, events);

        for sink in &mut self.sinks {
            sink.send(&snapshot);
        }
        if outcome.fired.is_some() || outcome.obstruction_sampled {
            if let Some(effects) = self.effects.as_mut() {
                effects.trigger(&snapshot);
            }
        }
        if let Some(source) = self.reward.as_mut() {
            let features = telemetry::reward_features(&snapshot, &self.state, &self.config, ammo);
            if let Some(reward) = source.reward(&snapshot, &features) {
                if reward.is_finite() {
                    self.state.tuning.apply_reward(reward, &self.config);
                } else {
                    warn!(reward, "ignoring non-finite reward");
                }
            }
        }

        let fired = snapshot.fired_target.clone();
        self.last_telemetry = Some(snapshot);
        fired
    }
}

/// The configured catalog, or a synthesized default round when it is empty.
fn resolve_catalog(config: &TurretConfig) -> Result<Vec<AmmunitionType>, TurretError> {
    if !config.ammunition_types.is_empty() {
        return Ok(config.ammunition_types.clone());
    }
    if !(config.projectile_speed > 0.0) {
        return Err(TurretError::EmptyAmmunitionCatalog);
    }
    Ok(vec![AmmunitionType::new(
        DEFAULT_AMMUNITION_NAME,
        config.projectile_speed,
        DEFAULT_AMMUNITION_DAMAGE,
    )
    .with_heat(DEFAULT_AMMUNITION_HEAT)])
}
