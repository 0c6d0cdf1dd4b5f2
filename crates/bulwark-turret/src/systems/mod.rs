//! Per-tick systems driven by [`crate::Turret`].
//!
//! Each system owns one slice of the turret state and is advanced by the
//! controller in a fixed order.

pub mod acquisition;
pub mod adaptive;
pub mod fire_control;
pub mod fusion;
pub mod manual;
pub mod resources;
pub mod telemetry;
