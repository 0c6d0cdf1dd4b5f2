//! Scripted manual-override sub-machine.
//!
//! While engaged the turret follows a queue of waypoints. Each waypoint is
//! held for its dwell time once aligned and may fire a burst; an operator
//! can also request a single shot at the current aim.

use std::collections::VecDeque;

use bulwark_core::config::TurretConfig;
use bulwark_core::events::TurretEvent;
use bulwark_core::types::ManualWaypoint;

use super::fire_control::Orientation;

/// Burst armed for the head waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub shots_remaining: u32,
    pub interval: f64,
    /// Seconds until the next burst shot may fire.
    pub spacing: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualOverride {
    pub active: bool,
    /// Clamped orientation the turret is driven toward.
    pub aim: Orientation,
    pub waypoints: VecDeque<ManualWaypoint>,
    /// Seconds the head waypoint has been held while aligned.
    pub dwell_timer: f64,
    pub burst: Option<Burst>,
    /// Whether the head waypoint already armed its burst.
    pub burst_armed: bool,
    pub fire_requested: bool,
}

impl ManualOverride {
    /// Enter manual control aimed at `aim`, replacing any queued script.
    pub fn engage(
        &mut self,
        aim: Orientation,
        waypoints: impl IntoIterator<Item = ManualWaypoint>,
        config: &TurretConfig,
    ) {
        self.active = true;
        self.aim = aim.clamped(config);
        self.waypoints = waypoints.into_iter().collect();
        self.reset_waypoint();
    }

    /// Leave manual control, dropping the script and any pending request.
    pub fn clear(&mut self) {
        self.active = false;
        self.waypoints.clear();
        self.fire_requested = false;
        self.reset_waypoint();
    }

    pub fn queue(&mut self, waypoint: ManualWaypoint) {
        self.waypoints.push_back(waypoint);
    }

    pub fn request_fire(&mut self) {
        self.fire_requested = true;
    }

    /// Take the pending single-shot request.
    pub fn take_request(&mut self) -> bool {
        std::mem::take(&mut self.fire_requested)
    }

    fn reset_waypoint(&mut self) {
        self.dwell_timer = 0.0;
        self.burst = None;
        self.burst_armed = false;
    }

    /// Sequence the head waypoint against the orientation at the start of
    /// the tick: aim at it, accrue dwell while aligned, arm its burst once,
    /// and pop it when the dwell completes.
    pub fn advance(
        &mut self,
        orientation: Orientation,
        dt: f64,
        config: &TurretConfig,
        events: &mut Vec<TurretEvent>,
    ) {
        let Some(head) = self.waypoints.front() else {
            return;
        };
        let target = Orientation::new(head.yaw_deg, head.pitch_deg).clamped(config);
        self.aim = target;

        if !orientation.aligned_with(target, config.fire_arc_deg) {
            self.dwell_timer = 0.0;
            return;
        }

        self.dwell_timer += dt;
        if head.fire_burst > 0 && !self.burst_armed {
            self.burst_armed = true;
            self.burst = Some(Burst {
                shots_remaining: head.fire_burst,
                interval: head.burst_interval.max(0.0),
                spacing: 0.0,
            });
        }

        if self.dwell_timer >= head.dwell_time {
            self.waypoints.pop_front();
            self.reset_waypoint();
            events.push(TurretEvent::WaypointReached {
                yaw_deg: target.yaw_deg,
                pitch_deg: target.pitch_deg,
            });
        }
    }

    /// Count down the spacing between burst shots.
    pub fn tick_burst(&mut self, dt: f64) {
        if let Some(burst) = self.burst.as_mut() {
            burst.spacing = (burst.spacing - dt).max(0.0);
        }
    }

    /// An armed burst shot is due.
    pub fn burst_ready(&self) -> bool {
        self.burst
            .map(|b| b.shots_remaining > 0 && b.spacing <= 0.0)
            .unwrap_or(false)
    }

    /// Record a fired burst shot.
    pub fn burst_fired(&mut self) {
        if let Some(burst) = self.burst.as_mut() {
            burst.shots_remaining = burst.shots_remaining.saturating_sub(1);
            burst.spacing = burst.interval;
            if burst.shots_remaining == 0 {
                self.burst = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual_with(waypoints: Vec<ManualWaypoint>) -> ManualOverride {
        let mut manual = ManualOverride::default();
        manual.engage(Orientation::default(), waypoints, &TurretConfig::default());
        manual
    }

    #[test]
    fn test_engage_clamps_aim() {
        let mut manual = ManualOverride::default();
        manual.engage(
            Orientation::new(200.0, 90.0),
            Vec::<ManualWaypoint>::new(),
            &TurretConfig::default(),
        );
        assert!(manual.active);
        assert_eq!(manual.aim, Orientation::new(-160.0, 60.0));
    }

    #[test]
    fn test_dwell_resets_when_misaligned() {
        let mut manual = manual_with(vec![ManualWaypoint::new(90.0, 0.0).with_dwell(1.0)]);
        let mut events = Vec::new();
        let config = TurretConfig::default();

        manual.advance(Orientation::new(90.0, 0.0), 0.3, &config, &mut events);
        assert!((manual.dwell_timer - 0.3).abs() < 1e-12);
        manual.advance(Orientation::new(0.0, 0.0), 0.3, &config, &mut events);
        assert_eq!(manual.dwell_timer, 0.0);
        assert_eq!(manual.aim, Orientation::new(90.0, 0.0));
    }

    #[test]
    fn test_waypoint_pops_after_dwell() {
        let mut manual = manual_with(vec![
            ManualWaypoint::new(10.0, 0.0).with_dwell(0.2),
            ManualWaypoint::new(20.0, 0.0),
        ]);
        let mut events = Vec::new();
        let config = TurretConfig::default();
        let at = Orientation::new(10.0, 0.0);

        manual.advance(at, 0.1, &config, &mut events);
        assert_eq!(manual.waypoints.len(), 2);
        manual.advance(at, 0.1, &config, &mut events);
        assert_eq!(manual.waypoints.len(), 1);
        assert_eq!(
            events,
            vec![TurretEvent::WaypointReached {
                yaw_deg: 10.0,
                pitch_deg: 0.0
            }]
        );
    }

    #[test]
    fn test_burst_armed_once_per_waypoint() {
        let mut manual = manual_with(vec![ManualWaypoint::new(0.0, 0.0)
            .with_dwell(10.0)
            .with_burst(2, 0.1)]);
        let mut events = Vec::new();
        let config = TurretConfig::default();
        let at = Orientation::default();

        manual.advance(at, 0.1, &config, &mut events);
        assert!(manual.burst_ready());
        manual.burst_fired();
        assert!(!manual.burst_ready(), "spacing applies between shots");
        manual.tick_burst(0.1);
        assert!(manual.burst_ready());
        manual.burst_fired();
        assert!(manual.burst.is_none());

        manual.advance(at, 0.1, &config, &mut events);
        assert!(manual.burst.is_none(), "burst does not re-arm on the same waypoint");
    }

    #[test]
    fn test_clear_drops_request_and_script() {
        let mut manual = manual_with(vec![ManualWaypoint::new(0.0, 0.0)]);
        manual.request_fire();
        manual.clear();
        assert!(!manual.active);
        assert!(manual.waypoints.is_empty());
        assert!(!manual.take_request());
    }
}
