//! Demo harness for the Bulwark turret controller.
//!
//! Moves a seeded set of contacts through a field of cover spheres, feeds
//! them to a [`bulwark_turret::Turret`] every tick and reports what it did.

pub mod cover;
pub mod engine;
pub mod error;
pub mod exporters;
pub mod feedback;
pub mod reward;
pub mod scenario;
pub mod sensors;
pub mod world;

pub use bulwark_turret as turret;
pub use engine::{Simulation, StepReport};
pub use error::SimError;
pub use scenario::ScenarioConfig;
