//! Collaborator interfaces the turret calls synchronously during a tick.
//!
//! Every collaborator is optional. An absent obstruction check never blocks,
//! an absent blend leaves orientation untouched, an absent reward source never
//! adjusts tunables, and [`NoFeedback`] ignores gauge updates.
//!
//! Closures can be adapted with [`FnHook`].

use bulwark_core::telemetry::{RewardFeatures, TurretTelemetry};
use bulwark_core::types::{ObstructionSample, Vector3};

/// Line-of-sight query from the turret to the predicted aim point.
pub trait ObstructionCheck {
    fn check(&mut self, origin: Vector3, point: Vector3) -> ObstructionSample;
}

/// Post-processes orientation after each rotation step (recoil sway and
/// similar). The turret re-clamps the result.
pub trait OrientationBlend {
    fn blend(&mut self, yaw_deg: f64, pitch_deg: f64) -> (f64, f64);
}

/// Gauge updates for external UI. Called only when a value actually changes.
pub trait TurretFeedback {
    fn heat_changed(&mut self, _heat: f64, _capacity: f64, _overheated: bool) {}

    fn power_changed(&mut self, _power: f64, _capacity: f64) {}

    fn obstruction_sampled(&mut self, _sample: &ObstructionSample) {}
}

/// Feedback sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl TurretFeedback for NoFeedback {}

/// Receives every telemetry snapshot at the end of a tick.
pub trait TelemetrySink {
    fn send(&mut self, telemetry: &TurretTelemetry);

    fn close(&mut self) {}
}

/// Receives snapshots of ticks that fired or sampled an obstruction, for
/// effect triggering.
pub trait EffectsSink {
    fn trigger(&mut self, telemetry: &TurretTelemetry);
}

/// Scores a tick for the adaptive loop. `None` skips adjustment.
pub trait RewardSource {
    fn reward(&mut self, telemetry: &TurretTelemetry, features: &RewardFeatures) -> Option<f64>;
}

/// Adapts a closure to one of the collaborator traits.
///
/// ```
/// use bulwark_turret::hooks::{FnHook, ObstructionCheck};
/// use bulwark_turret::core::types::Vector3;
///
/// let mut never_clear = FnHook(|_origin: Vector3, _point: Vector3| false);
/// assert!(never_clear.check(Vector3::ZERO, Vector3::X).blocked);
/// ```
pub struct FnHook<F>(pub F);

impl<F, O> ObstructionCheck for FnHook<F>
where
    F: FnMut(Vector3, Vector3) -> O,
    O: Into<ObstructionSample>,
{
    fn check(&mut self, origin: Vector3, point: Vector3) -> ObstructionSample {
        (self.0)(origin, point).into()
    }
}

impl<F> OrientationBlend for FnHook<F>
where
    F: FnMut(f64, f64) -> (f64, f64),
{
    fn blend(&mut self, yaw_deg: f64, pitch_deg: f64) -> (f64, f64) {
        (self.0)(yaw_deg, pitch_deg)
    }
}

impl<F> TelemetrySink for FnHook<F>
where
    F: FnMut(&TurretTelemetry),
{
    fn send(&mut self, telemetry: &TurretTelemetry) {
        (self.0)(telemetry)
    }
}

impl<F> RewardSource for FnHook<F>
where
    F: FnMut(&TurretTelemetry, &RewardFeatures) -> Option<f64>,
{
    fn reward(&mut self, telemetry: &TurretTelemetry, features: &RewardFeatures) -> Option<f64> {
        (self.0)(telemetry, features)
    }
}
