//! Particle storage for the engine.
//!
//! `Particles` is a structure-of-arrays container: every per-particle attribute
//! is its own contiguous nalgebra buffer, indexed by particle index.
//! - `i`    particle index (`0..count`)
//! - `mass` one scalar per particle
//! - `pos`, `v`, `a` stored as `dimensions x count` matrices, one column per particle
//! - any number of extra columns declared at construction
//!
//! Count and dimensionality are fixed when the store is built. Mutable access
//! hands out matrix views, so values can be overwritten but shapes cannot change.

use std::fmt;
use std::str::FromStr;

use log::debug;
use nalgebra::{DMatrix, DMatrixViewMut, DVector, DVectorView, DVectorViewMut};

use crate::error::{Result, SimError};

/// Dimensionalities the store accepts
pub const SUPPORTED_DIMENSIONS: [usize; 2] = [2, 3];

/// Names of the built-in columns, in schema order
pub const BUILTIN_COLUMNS: [&str; 5] = ["i", "mass", "pos", "v", "a"];

/// Element type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Bool,
    Int,
    Float,
    /// Fixed-length float vector per particle
    Vector(usize),
}

impl FromStr for ColumnType {
    type Err = SimError;

    /// Accepts `bool`, `int`/`i64`, `float`/`f64` and `vecN` (N >= 1)
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bool" => Ok(ColumnType::Bool),
            "int" | "i64" => Ok(ColumnType::Int),
            "float" | "f64" => Ok(ColumnType::Float),
            other => other
                .strip_prefix("vec")
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|&n| n >= 1)
                .map(ColumnType::Vector)
                .ok_or_else(|| SimError::InvalidFieldType(other.to_string())),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Bool => write!(f, "bool"),
            ColumnType::Int => write!(f, "int"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Vector(n) => write!(f, "vec{n}"),
        }
    }
}

/// Declaration of an extra per-particle column
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraField {
    pub name: String,
    pub kind: ColumnType,
}

impl ExtraField {
    pub fn new(name: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone)]
enum ColumnData {
    Bool(Vec<bool>),
    Int(Vec<i64>),
    Float(DVector<f64>),
    Vector(DMatrix<f64>),
}

/// Storage for one extra column. Length is fixed at `count`
#[derive(Debug, Clone)]
pub struct Column {
    data: ColumnData,
}

impl Column {
    fn zeros(kind: ColumnType, count: usize) -> Self {
        let data = match kind {
            ColumnType::Bool => ColumnData::Bool(vec![false; count]),
            ColumnType::Int => ColumnData::Int(vec![0; count]),
            ColumnType::Float => ColumnData::Float(DVector::zeros(count)),
            ColumnType::Vector(n) => ColumnData::Vector(DMatrix::zeros(n, count)),
        };
        Self { data }
    }

    pub fn kind(&self) -> ColumnType {
        match &self.data {
            ColumnData::Bool(_) => ColumnType::Bool,
            ColumnData::Int(_) => ColumnType::Int,
            ColumnData::Float(_) => ColumnType::Float,
            ColumnData::Vector(m) => ColumnType::Vector(m.nrows()),
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Bool(b) => b.len(),
            ColumnData::Int(i) => i.len(),
            ColumnData::Float(f) => f.len(),
            ColumnData::Vector(m) => m.ncols(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bool(&self) -> Option<&[bool]> {
        match &self.data {
            ColumnData::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_bool_mut(&mut self) -> Option<&mut [bool]> {
        match &mut self.data {
            ColumnData::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&[i64]> {
        match &self.data {
            ColumnData::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_int_mut(&mut self) -> Option<&mut [i64]> {
        match &mut self.data {
            ColumnData::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&DVector<f64>> {
        match &self.data {
            ColumnData::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_float_mut(&mut self) -> Option<DVectorViewMut<'_, f64>> {
        match &mut self.data {
            ColumnData::Float(f) => {
                let n = f.len();
                Some(f.rows_mut(0, n))
            }
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&DMatrix<f64>> {
        match &self.data {
            ColumnData::Vector(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_vector_mut(&mut self) -> Option<DMatrixViewMut<'_, f64>> {
        match &mut self.data {
            ColumnData::Vector(m) => {
                let n = m.ncols();
                Some(m.columns_mut(0, n))
            }
            _ => None,
        }
    }
}

/// Structure-of-arrays particle container
#[derive(Debug, Clone)]
pub struct Particles {
    count: usize,
    dimensions: usize,
    pub(crate) i: Vec<usize>,
    pub(crate) mass: DVector<f64>,
    pub(crate) pos: DMatrix<f64>,
    pub(crate) v: DMatrix<f64>,
    pub(crate) a: DMatrix<f64>,
    extras: Vec<(ExtraField, Column)>,
}

impl Particles {
    /// Build `count` particles in `dimensions` dimensions with the given extra columns
    ///
    /// Indices run `0..count`, masses start at `1.0`, every other value starts at zero.
    pub fn new(count: usize, dimensions: usize, extra_fields: &[ExtraField]) -> Result<Self> {
        if count < 1 {
            return Err(SimError::ZeroCount);
        }
        if !SUPPORTED_DIMENSIONS.contains(&dimensions) {
            return Err(SimError::InvalidDimensions(dimensions));
        }
        validate_extra_fields(extra_fields)?;

        let extras = extra_fields
            .iter()
            .map(|f| (f.clone(), Column::zeros(f.kind, count)))
            .collect();

        debug!(
            "particles: count={count} dimensions={dimensions} extra_fields={}",
            extra_fields.len()
        );

        Ok(Self {
            count,
            dimensions,
            i: (0..count).collect(),
            mass: DVector::from_element(count, 1.0),
            pos: DMatrix::zeros(dimensions, count),
            v: DMatrix::zeros(dimensions, count),
            a: DMatrix::zeros(dimensions, count),
            extras,
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Every column as `(name, type)`: built-ins first, then extras in declaration order
    pub fn schema(&self) -> Vec<(&str, ColumnType)> {
        let d = ColumnType::Vector(self.dimensions);
        let mut schema: Vec<(&str, ColumnType)> = vec![
            ("i", ColumnType::Int),
            ("mass", ColumnType::Float),
            ("pos", d),
            ("v", d),
            ("a", d),
        ];
        schema.extend(self.extras.iter().map(|(f, _)| (f.name.as_str(), f.kind)));
        schema
    }

    pub fn indices(&self) -> &[usize] {
        &self.i
    }

    /// Relabel particles; the slice length stays `count`
    pub fn indices_mut(&mut self) -> &mut [usize] {
        &mut self.i
    }

    pub fn mass(&self) -> &DVector<f64> {
        &self.mass
    }

    pub fn mass_mut(&mut self) -> DVectorViewMut<'_, f64> {
        self.mass.rows_mut(0, self.count)
    }

    pub fn pos(&self) -> &DMatrix<f64> {
        &self.pos
    }

    pub fn pos_mut(&mut self) -> DMatrixViewMut<'_, f64> {
        self.pos.columns_mut(0, self.count)
    }

    pub fn v(&self) -> &DMatrix<f64> {
        &self.v
    }

    pub fn v_mut(&mut self) -> DMatrixViewMut<'_, f64> {
        self.v.columns_mut(0, self.count)
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn a_mut(&mut self) -> DMatrixViewMut<'_, f64> {
        self.a.columns_mut(0, self.count)
    }

    /// Position of particle `i`. Panics if `i >= count`
    pub fn position(&self, i: usize) -> DVectorView<'_, f64> {
        self.pos.column(i)
    }

    /// Velocity of particle `i`. Panics if `i >= count`
    pub fn velocity(&self, i: usize) -> DVectorView<'_, f64> {
        self.v.column(i)
    }

    /// Acceleration of particle `i`. Panics if `i >= count`
    pub fn acceleration(&self, i: usize) -> DVectorView<'_, f64> {
        self.a.column(i)
    }

    pub fn set_position(&mut self, i: usize, values: &[f64]) -> Result<()> {
        self.check_vector(i, values)?;
        self.pos.column_mut(i).copy_from_slice(values);
        Ok(())
    }

    pub fn set_velocity(&mut self, i: usize, values: &[f64]) -> Result<()> {
        self.check_vector(i, values)?;
        self.v.column_mut(i).copy_from_slice(values);
        Ok(())
    }

    pub fn set_mass(&mut self, i: usize, mass: f64) -> Result<()> {
        self.check_index(i)?;
        self.mass[i] = mass;
        Ok(())
    }

    pub fn extra(&self, name: &str) -> Option<&Column> {
        self.extras
            .iter()
            .find(|(f, _)| f.name == name)
            .map(|(_, c)| c)
    }

    pub fn extra_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.extras
            .iter_mut()
            .find(|(f, _)| f.name == name)
            .map(|(_, c)| c)
    }

    /// Clamp every position component `k` into `[lower[k], upper[k]]`
    pub fn clip_positions(&mut self, lower: &[f64], upper: &[f64]) -> Result<()> {
        for bound in [lower, upper] {
            if bound.len() != self.dimensions {
                return Err(SimError::DimensionMismatch {
                    expected: self.dimensions,
                    found: bound.len(),
                });
            }
        }
        for (k, mut row) in self.pos.row_iter_mut().enumerate() {
            let (lo, hi) = (lower[k], upper[k]);
            row.apply(|x| *x = x.max(lo).min(hi));
        }
        Ok(())
    }

    pub fn zero_acceleration(&mut self) {
        self.a.fill(0.0);
    }

    fn check_index(&self, i: usize) -> Result<()> {
        if i >= self.count {
            return Err(SimError::IndexOutOfRange {
                index: i,
                count: self.count,
            });
        }
        Ok(())
    }

    fn check_vector(&self, i: usize, values: &[f64]) -> Result<()> {
        self.check_index(i)?;
        if values.len() != self.dimensions {
            return Err(SimError::DimensionMismatch {
                expected: self.dimensions,
                found: values.len(),
            });
        }
        Ok(())
    }
}

fn validate_extra_fields(extra_fields: &[ExtraField]) -> Result<()> {
    let mut seen: Vec<&str> = BUILTIN_COLUMNS.to_vec();
    for field in extra_fields {
        if field.name.is_empty() {
            return Err(SimError::InvalidFieldName("empty name".to_string()));
        }
        if seen.contains(&field.name.as_str()) {
            return Err(SimError::DuplicateField(field.name.clone()));
        }
        if let ColumnType::Vector(0) = field.kind {
            return Err(SimError::InvalidFieldType(field.kind.to_string()));
        }
        seen.push(&field.name);
    }
    Ok(())
}
