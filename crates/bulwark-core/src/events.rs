//! Events emitted by the turret during a tick, for effects and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::ShotKind;
use crate::types::Vector3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TurretEvent {
    /// A new target lock was acquired.
    TargetAcquired { target_id: String },
    /// The lock was dropped after the memory window expired.
    TargetLost { target_id: String },
    /// A projectile was fired.
    Fired {
        target_id: String,
        kind: ShotKind,
        ammunition: String,
    },
    /// Heat crossed the overheat threshold.
    Overheated { heat: f64 },
    /// Heat fell to the resume threshold.
    CooledDown { heat: f64 },
    /// The obstruction check blocked a shot.
    LineOfSightBlocked { hit_position: Option<Vector3> },
    /// Active ammunition changed.
    AmmunitionChanged { name: String },
    ManualOverrideEngaged { waypoints: usize },
    ManualOverrideCleared,
    /// A scripted waypoint finished its dwell.
    WaypointReached { yaw_deg: f64, pitch_deg: f64 },
}
