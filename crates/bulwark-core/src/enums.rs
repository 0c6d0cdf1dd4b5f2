//! Enumeration types used throughout the controller.

use serde::{Deserialize, Serialize};

/// Top-level control state reported each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireControlState {
    /// No lock; sweeping the idle scan pattern.
    #[default]
    Idle,
    /// Locked on a target, not (yet) able to fire.
    Tracking,
    /// All gates passed; a shot left the barrel this tick.
    ReadyToFire,
    /// Scripted manual control; autonomous tracking suspended.
    ManualOverride,
}

/// Which path produced a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotKind {
    Autonomous,
    ManualSingle,
    ManualBurst,
}

/// Why a shot was withheld. These are normal control-flow outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WithholdReason {
    /// Orientation outside the fire arc on at least one axis.
    Misaligned,
    /// Cooldown from the previous shot has not elapsed.
    CoolingDown,
    /// Barrel is overheated.
    Overheated,
    /// Overheat cleared this very tick.
    ResumingFromOverheat,
    /// The obstruction check reported the line of fire blocked.
    Obstructed,
    /// Not enough stored power for a shot.
    InsufficientPower,
}
