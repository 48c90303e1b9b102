//! Error types for the particle engine.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("Number of particles must be positive and non-zero.")]
    ZeroCount,

    #[error("Invalid number of dimensions ({0}). Try 2D or 3D.")]
    InvalidDimensions(usize),

    #[error("Extra parameter names must be strings: {0}")]
    InvalidFieldName(String),

    #[error("Duplicate column name: {0}")]
    DuplicateField(String),

    #[error("Invalid datatype provided for extra parameter: {0}")]
    InvalidFieldType(String),

    #[error("A {expected}-dimensional vector should be provided (got {found}).")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Direction vectors must have non-zero length.")]
    ZeroLengthVector,

    #[error("{field} requires a {required}-dimensional store, got {found} dimensions.")]
    RequiresDimensions {
        field: &'static str,
        required: usize,
        found: usize,
    },

    #[error("Mask has {found} entries but there are {expected} particles.")]
    MaskLength { expected: usize, found: usize },

    #[error("Well centre coordinates must be non-zero, got ({0}, {1}).")]
    DegenerateWellCenter(f64, f64),

    #[error("Particle index {index} out of range for {count} particles.")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Timestep must be finite and positive, got {0}.")]
    InvalidTimestep(f64),
}

pub type Result<T> = std::result::Result<T, SimError>;
