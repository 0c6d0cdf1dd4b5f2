//! BULWARK turret engine: a deterministic, headless turret controller.
//!
//! [`Turret`] owns all mutable state and advances it one fixed step per
//! [`Turret::update`]. External concerns (line of sight, telemetry
//! transport, rewards, UI gauges) are injected through the traits in
//! [`hooks`].

pub mod ballistics;
pub mod hooks;
pub mod state;
pub mod systems;
pub mod turret;

pub use bulwark_core as core;
pub use turret::Turret;
