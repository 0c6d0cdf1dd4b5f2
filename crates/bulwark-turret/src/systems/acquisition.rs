//! Target selection, lock maintenance and the idle scan pattern.

use std::cmp::Ordering;

use bulwark_core::config::TurretConfig;
use bulwark_core::types::{Target, Vector3};

use super::fusion::FusionTable;

/// Current lock: the target id plus its last-known kinematics, used only
/// while coasting inside the memory window.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackLock {
    pub last_known: Target,
    pub time_since_seen: f64,
}

impl TrackLock {
    pub fn new(target: Target) -> Self {
        Self {
            last_known: target,
            time_since_seen: 0.0,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.last_known.id
    }
}

/// Outcome of re-resolving a lock against this tick's observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    /// Present and inside the detection radius.
    Held,
    /// Absent or out of range, but still inside the memory window.
    Coasting,
    /// Memory window exceeded; the lock must be dropped.
    Lost,
}

/// Re-resolve `lock` by id, refreshing its cached kinematics when present.
pub fn refresh_lock(
    lock: &mut TrackLock,
    targets: &[Target],
    origin: Vector3,
    dt: f64,
    config: &TurretConfig,
) -> LockStatus {
    let mut in_range = false;
    if let Some(observed) = targets.iter().find(|t| t.id == lock.last_known.id) {
        lock.last_known = observed.clone();
        in_range = origin.distance(observed.position) <= config.detection_radius;
    }

    if in_range {
        lock.time_since_seen = 0.0;
        return LockStatus::Held;
    }

    lock.time_since_seen += dt;
    if lock.time_since_seen > config.target_memory {
        LockStatus::Lost
    } else {
        LockStatus::Coasting
    }
}

/// Weighted engagement score: priority plus biased fused threat.
pub fn engagement_score(
    target: &Target,
    config: &TurretConfig,
    threat_bias: f64,
    fusion: &FusionTable,
) -> f64 {
    let fused = fusion.total_threat(&target.id);
    f64::from(target.priority) + config.cooperative_threat_weight * threat_bias * fused
}

/// Best candidate inside the detection radius.
///
/// Highest score wins, ties go to the nearer target, exact ties keep the
/// earliest candidate.
pub fn select_target<'a>(
    candidates: &'a [Target],
    origin: Vector3,
    config: &TurretConfig,
    threat_bias: f64,
    fusion: &FusionTable,
) -> Option<&'a Target> {
    candidates
        .iter()
        .filter_map(|target| {
            let distance = origin.distance(target.position);
            (distance <= config.detection_radius).then(|| {
                let score = engagement_score(target, config, threat_bias, fusion);
                (target, score, distance)
            })
        })
        .min_by(|(_, score_a, dist_a), (_, score_b, dist_b)| {
            match score_b.total_cmp(score_a) {
                Ordering::Equal => dist_a.total_cmp(dist_b),
                ordering => ordering,
            }
        })
        .map(|(target, _, _)| target)
}

/// Desired orientation of the idle sweep after `idle_time` seconds.
pub fn idle_scan_angles(idle_time: f64, config: &TurretConfig) -> (f64, f64) {
    let phase = idle_time * config.idle_scan_speed_deg.to_radians();
    let yaw = phase.sin() * config.idle_scan_yaw_range_deg;
    let pitch = (phase * 0.5).sin() * config.idle_scan_pitch_deg;
    (yaw, pitch)
}
