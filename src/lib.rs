//! Small particle-dynamics engine.
//!
//! Particles live in a structure-of-arrays store, independent force fields add
//! their acceleration on masked subsets, and a velocity-Verlet integrator
//! advances the whole set by fixed steps.

pub mod error;
pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use error::{Result, SimError};

pub use simulation::states::{Particles, ExtraField, ColumnType, Column};
pub use simulation::forces::{Field, Force, AccelSet, ConstantForce, ConstantAcceleration, Wall, Well2D};
pub use simulation::integrator::VelocityVerlet;
pub use simulation::params::Parameters;
pub use simulation::scenario::Scenario;

pub use configuration::config::{ParametersConfig, ParticlesConfig, BodyConfig, ExtraFieldConfig, FieldConfig, ScenarioConfig};

pub use benchmark::benchmark::bench_verlet;
