//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`ParametersConfig`] – step size, end time and logging cadence
//! - [`ParticlesConfig`]  – particle count, dimensionality, extra columns and initial state
//! - [`FieldConfig`]      – one entry per force contributor
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! A 2D scenario matching these types:
//!
//! ```yaml
//! parameters:
//!   h0: 0.1                 # fixed step size
//!   t_end: 10.0             # total simulation time
//!   log_every: 50           # optional, 0 disables progress logs
//!
//! particles:
//!   count: 2
//!   dimensions: 2
//!   extra_fields:           # optional [name, type] pairs
//!     - [charge, float]
//!   bodies:                 # optional, applied to particles 0, 1, ...
//!     - pos: [20.0, 30.0]
//!       v: [0.0, 0.0]
//!       mass: 1.0
//!     - pos: [70.0, 60.0]
//!
//! fields:
//!   - type: well2d
//!     depth: 2
//!     center: [50.0, 50.0]
//!   - type: wall
//!     position: [0.0, 0.0]
//!     normal: [0.0, 1.0]
//! ```
//!
//! Extra-field entries are kept as raw YAML values so that a non-string name or
//! an unknown type surfaces as a typed error when the scenario is built, rather
//! than as a generic parse failure.

use serde::Deserialize;

/// Global numerical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub h0: f64,    // time step size
    pub t_end: f64, // time end
    #[serde(default)]
    pub log_every: u64, // steps between progress logs
}

/// One `[name, type]` extra column declaration
#[derive(Deserialize, Debug, Clone)]
pub struct ExtraFieldConfig(pub serde_yaml::Value, pub serde_yaml::Value);

/// Initial state for a single particle; missing entries keep their defaults
#[derive(Deserialize, Debug, Clone, Default)]
pub struct BodyConfig {
    pub pos: Option<Vec<f64>>, // position
    pub v: Option<Vec<f64>>,   // velocity
    pub mass: Option<f64>,     // mass
}

/// Shape and initial state of the particle store
#[derive(Deserialize, Debug, Clone)]
pub struct ParticlesConfig {
    pub count: usize,
    pub dimensions: usize,
    #[serde(default)]
    pub extra_fields: Vec<ExtraFieldConfig>,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}

/// A force contributor, tagged by `type`
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldConfig {
    ConstantForce {
        direction: Vec<f64>,
        force: f64,
        #[serde(default)]
        mask: Option<Vec<bool>>,
    },
    ConstantAcceleration {
        direction: Vec<f64>,
        acceleration: f64,
        #[serde(default)]
        mask: Option<Vec<bool>>,
    },
    Wall {
        position: Vec<f64>,
        normal: Vec<f64>,
        #[serde(default)]
        stiffness: Option<f64>,
        #[serde(default)]
        mask: Option<Vec<bool>>,
    },
    #[serde(rename = "well2d")]
    Well2D {
        depth: f64,
        center: [f64; 2],
        #[serde(default)]
        mask: Option<Vec<bool>>,
    },
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub parameters: ParametersConfig, // step size and end time
    pub particles: ParticlesConfig, // particle store and its initial state
    #[serde(default)]
    pub fields: Vec<FieldConfig>, // force contributors, summed in order
}
