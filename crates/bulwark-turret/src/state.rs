//! The turret's single mutable aggregate.
//!
//! Every field is written only by [`crate::Turret`]; outside the crate the
//! state is read through accessors.

use std::collections::VecDeque;

use bulwark_core::config::TurretConfig;
use bulwark_core::telemetry::Tunables;
use bulwark_core::types::{ManualWaypoint, ObstructionSample, Target};

use crate::systems::acquisition::TrackLock;
use crate::systems::adaptive::AdaptiveTuning;
use crate::systems::fire_control::Orientation;
use crate::systems::fusion::FusionTable;
use crate::systems::manual::ManualOverride;
use crate::systems::resources::Resources;

#[derive(Debug, Clone, PartialEq)]
pub struct TurretState {
    pub(crate) orientation: Orientation,
    pub(crate) cooldown: f64,
    pub(crate) lock: Option<TrackLock>,
    pub(crate) idle_time: f64,
    pub(crate) last_prediction_time: f64,
    pub(crate) ammunition_index: usize,
    pub(crate) resources: Resources,
    pub(crate) last_obstruction: Option<ObstructionSample>,
    pub(crate) manual: ManualOverride,
    pub(crate) fusion: FusionTable,
    pub(crate) tuning: AdaptiveTuning,
    pub(crate) elapsed: f64,
    pub(crate) tick: u64,
}

impl TurretState {
    pub(crate) fn new(config: &TurretConfig, ammunition_index: usize) -> Self {
        Self {
            orientation: Orientation::default(),
            cooldown: 0.0,
            lock: None,
            idle_time: 0.0,
            last_prediction_time: 0.0,
            ammunition_index,
            resources: Resources::new(config),
            last_obstruction: None,
            manual: ManualOverride::default(),
            fusion: FusionTable::new(),
            tuning: AdaptiveTuning::new(config),
            elapsed: 0.0,
            tick: 0,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn yaw_deg(&self) -> f64 {
        self.orientation.yaw_deg
    }

    pub fn pitch_deg(&self) -> f64 {
        self.orientation.pitch_deg
    }

    /// Seconds until the next shot is allowed.
    pub fn cooldown(&self) -> f64 {
        self.cooldown
    }

    /// Last-known kinematics of the locked target.
    pub fn tracked_target(&self) -> Option<&Target> {
        self.lock.as_ref().map(|lock| &lock.last_known)
    }

    pub fn tracked_target_id(&self) -> Option<&str> {
        self.lock.as_ref().map(TrackLock::target_id)
    }

    /// Seconds since the locked target was last seen in range.
    pub fn time_since_seen(&self) -> f64 {
        self.lock.as_ref().map_or(0.0, |lock| lock.time_since_seen)
    }

    pub fn idle_time(&self) -> f64 {
        self.idle_time
    }

    /// Lead time of the most recent aim (0 = no valid lead).
    pub fn last_prediction_time(&self) -> f64 {
        self.last_prediction_time
    }

    pub fn ammunition_index(&self) -> usize {
        self.ammunition_index
    }

    pub fn heat(&self) -> f64 {
        self.resources.heat
    }

    pub fn overheated(&self) -> bool {
        self.resources.overheated
    }

    pub fn power(&self) -> f64 {
        self.resources.power
    }

    pub fn last_obstruction(&self) -> Option<&ObstructionSample> {
        self.last_obstruction.as_ref()
    }

    pub fn manual_override_active(&self) -> bool {
        self.manual.active
    }

    pub fn manual_waypoints(&self) -> &VecDeque<ManualWaypoint> {
        &self.manual.waypoints
    }

    pub fn manual_fire_requested(&self) -> bool {
        self.manual.fire_requested
    }

    pub fn fusion(&self) -> &FusionTable {
        &self.fusion
    }

    pub fn tunables(&self) -> Tunables {
        self.tuning.tunables()
    }

    /// Simulated seconds since construction.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of completed updates.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}
