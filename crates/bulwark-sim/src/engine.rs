//! Simulation engine for the turret demo.
//!
//! `Simulation` owns the contact world, the turret and the seeded RNG, runs
//! the scripted scenario around the turret and formats one status line per
//! tick. Completely headless; same seed, same run.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use bulwark_core::types::{ObstructionSample, Target};
use bulwark_turret::hooks::TelemetrySink;
use bulwark_turret::Turret;

use crate::cover::CoverField;
use crate::error::SimError;
use crate::feedback::FeedbackLog;
use crate::reward::RewardShaper;
use crate::scenario::ScenarioConfig;
use crate::sensors::AlliedSensorFeed;
use crate::world::ContactWorld;

/// What happened during one [`Simulation::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub tick: u64,
    /// Scenario time after the step (seconds).
    pub time: f64,
    pub fired: Option<String>,
    /// Scripted actions taken this step.
    pub messages: Vec<String>,
    /// Heat, power and cover notices from the turret.
    pub feedback: Vec<String>,
    pub status: String,
}

pub struct Simulation {
    scenario: ScenarioConfig,
    world: ContactWorld,
    turret: Turret,
    rng: ChaCha8Rng,
    feedback: FeedbackLog,
    sensors: Option<AlliedSensorFeed>,
    time: f64,
    tick: u64,
    next_ammo_cycle: f64,
    manual_active: bool,
    manual_done: bool,
}

impl Simulation {
    /// Build the turret and spawn the initial contacts.
    pub fn new(scenario: ScenarioConfig) -> Result<Self, SimError> {
        scenario.validate()?;

        let feedback = FeedbackLog::new();
        let mut turret = Turret::new(scenario.turret_position, scenario.turret.clone())?
            .with_obstruction_check(CoverField::new(scenario.cover.clone()))
            .with_feedback(feedback.clone());
        if scenario.adaptive {
            turret = turret.with_reward_source(RewardShaper::default());
        }

        let mut rng = ChaCha8Rng::seed_from_u64(scenario.seed);
        let mut world = ContactWorld::new();
        for _ in 0..scenario.initial_contacts {
            world.spawn_random(&mut rng, &scenario.spawn);
        }

        Ok(Self {
            sensors: scenario.sensors.clone().map(AlliedSensorFeed::new),
            next_ammo_cycle: scenario.ammo_cycle_interval,
            scenario,
            world,
            turret,
            rng,
            feedback,
            time: 0.0,
            tick: 0,
            manual_active: false,
            manual_done: false,
        })
    }

    pub fn add_telemetry_sink(&mut self, sink: impl TelemetrySink + 'static) {
        self.turret.add_telemetry_sink(sink);
    }

    /// Advance the scenario by `dt` seconds.
    pub fn step(&mut self, dt: f64) -> StepReport {
        self.time += dt;
        self.tick += 1;

        self.world.advance(dt);
        let removed = self
            .world
            .despawn_beyond(self.turret.position(), self.scenario.despawn_range);
        if removed > 0 {
            debug!(removed, remaining = self.world.len(), "contacts left the area");
        }
        let targets = self.world.targets();

        let mut messages = Vec::new();
        self.run_ammo_schedule(&mut messages);
        self.run_manual_plan(&mut messages);
        self.run_sensors(dt, &targets);

        let fired = self.turret.update(dt, &targets);
        let feedback = self.feedback.drain();
        let status = self.status_line(fired.as_deref(), &messages, &feedback);

        StepReport {
            tick: self.tick,
            time: self.time,
            fired,
            messages,
            feedback,
            status,
        }
    }

    /// Run `ticks` steps of the scenario's `dt`, handing each report to `on_step`.
    pub fn run(&mut self, ticks: u64, mut on_step: impl FnMut(&StepReport)) {
        let dt = self.scenario.dt;
        for _ in 0..ticks {
            let report = self.step(dt);
            on_step(&report);
        }
    }

    /// Close every telemetry sink.
    pub fn finish(&mut self) {
        self.turret.close_sinks();
    }

    pub fn turret(&self) -> &Turret {
        &self.turret
    }

    pub fn turret_mut(&mut self) -> &mut Turret {
        &mut self.turret
    }

    pub fn world(&self) -> &ContactWorld {
        &self.world
    }

    /// Direct access to the contacts, e.g. to place scripted ones.
    pub fn world_mut(&mut self) -> &mut ContactWorld {
        &mut self.world
    }

    pub fn scenario(&self) -> &ScenarioConfig {
        &self.scenario
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    fn run_ammo_schedule(&mut self, messages: &mut Vec<String>) {
        let interval = self.scenario.ammo_cycle_interval;
        if interval <= 0.0 || self.time < self.next_ammo_cycle {
            return;
        }
        let ammo = self.turret.cycle_ammunition();
        messages.push(format!("switched ammo -> {}", ammo.name));
        self.next_ammo_cycle += interval;
    }

    fn run_manual_plan(&mut self, messages: &mut Vec<String>) {
        let plan = &self.scenario.manual;
        if !plan.enabled {
            return;
        }
        if !self.manual_active && !self.manual_done && self.time >= plan.start {
            self.turret
                .engage_manual_override(plan.yaw_deg, plan.pitch_deg, plan.waypoints.clone());
            self.manual_active = true;
            messages.push("manual override engaged".to_string());
        } else if self.manual_active && self.time >= plan.end {
            self.turret.clear_manual_override();
            self.manual_active = false;
            self.manual_done = true;
            messages.push("manual override released".to_string());
        }
    }

    fn run_sensors(&mut self, dt: f64, targets: &[Target]) {
        let Some(sensors) = self.sensors.as_mut() else {
            return;
        };
        let reports = sensors.poll(dt, targets, &mut self.rng);
        if !reports.is_empty() {
            self.turret.ingest_designations(&reports);
        }
    }

    fn status_line(&self, fired: Option<&str>, messages: &[String], feedback: &[String]) -> String {
        let state = self.turret.state();
        let config = self.turret.config();
        let mut status = format!(
            "time={:4.1}s yaw={:6.1} pitch={:5.1} ammo={:8} heat={:4.1} power={:4.1}/{:4.1}",
            self.time,
            state.yaw_deg(),
            state.pitch_deg(),
            self.turret.current_ammunition().name,
            state.heat(),
            state.power(),
            config.power_capacity,
        );
        if let Some(id) = state.tracked_target_id() {
            status.push_str(&format!(" tracking={id}"));
            let prediction = state.last_prediction_time();
            if prediction > 0.0 {
                status.push_str(&format!(" tti={prediction:4.2}s"));
            }
        }
        if state.overheated() {
            status.push_str(" [OVERHEATED]");
        }
        if state.manual_override_active() {
            status.push_str(" [MANUAL]");
        }
        if let Some(id) = fired {
            status.push_str(&format!(" -> Fired at target {id}!"));
        }
        if let Some(sample) = state.last_obstruction().filter(|s| s.blocked) {
            status.push_str(" | LOS blocked");
            push_hit_position(&mut status, sample);
        }
        if !messages.is_empty() {
            status.push_str(" | ");
            status.push_str(&messages.join(", "));
        }
        if !feedback.is_empty() {
            status.push_str(" | feedback=");
            status.push_str(&feedback.join(", "));
        }
        status
    }
}

fn push_hit_position(status: &mut String, sample: &ObstructionSample) {
    if let Some(hit) = sample.hit_position {
        status.push_str(&format!(" at ({:.1}, {:.1}, {:.1})", hit.x, hit.y, hit.z));
    }
}
