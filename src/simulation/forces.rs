//! Force / acceleration contributors for the particle engine
//!
//! Every contributor implements [`Field`]: it validates itself against a
//! particle store, reports which particles it acts on (the mask), and adds its
//! acceleration into `a` for those particles. The concrete laws are tagged
//! cases of [`Force`], and [`AccelSet`] sums them in order.
//!
//! Contributions are additive and independent, so the order of terms in an
//! `AccelSet` does not change the result beyond floating-point rounding.

use log::{debug, trace};
use nalgebra::DVector;

use crate::error::{Result, SimError};
use crate::simulation::states::Particles;

/// Acceleration applied to particles behind a [`Wall`] unless overridden
pub const DEFAULT_WALL_STIFFNESS: f64 = 1.0e6;

/// Interface shared by every force contributor
///
/// `mask` and `accelerate` validate against `particles` before touching it, so
/// a mismatched store is reported as an error rather than a panic or a short mask.
pub trait Field {
    /// Check vector parameters and mask against the store's shape
    fn validate(&self, particles: &Particles) -> Result<()>;

    /// One entry per particle, `true` where this contributor acts
    fn mask(&self, particles: &Particles) -> Result<Vec<bool>>;

    /// Add this contributor's acceleration into `particles.a` for masked particles
    fn accelerate(&self, particles: &mut Particles) -> Result<()>;
}

/// Divide `v` by its Euclidean norm
fn normalise(v: &[f64]) -> Result<DVector<f64>> {
    let v = DVector::from_column_slice(v);
    let norm = v.norm();
    if norm == 0.0 {
        return Err(SimError::ZeroLengthVector);
    }
    Ok(v / norm)
}

/// numpy-style sign: zero maps to zero
fn sign(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x.signum()
    }
}

fn check_dimensions(particles: &Particles, found: usize) -> Result<()> {
    let expected = particles.dimensions();
    if expected != found {
        return Err(SimError::DimensionMismatch { expected, found });
    }
    Ok(())
}

fn check_mask(particles: &Particles, mask: Option<&[bool]>) -> Result<()> {
    match mask {
        Some(m) if m.len() != particles.count() => Err(SimError::MaskLength {
            expected: particles.count(),
            found: m.len(),
        }),
        _ => Ok(()),
    }
}

fn user_mask(particles: &Particles, mask: Option<&[bool]>) -> Vec<bool> {
    match mask {
        Some(m) => m.to_vec(),
        None => vec![true; particles.count()],
    }
}

/// Constant force of fixed magnitude and direction; acceleration is `force / mass`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantForce {
    direction: DVector<f64>, // unit vector
    force: f64,
    mask: Option<Vec<bool>>,
}

impl ConstantForce {
    pub fn new(direction: &[f64], force: f64) -> Result<Self> {
        Ok(Self {
            direction: normalise(direction)?,
            force,
            mask: None,
        })
    }

    /// Restrict the force to particles whose mask entry is `true`
    pub fn with_mask(mut self, mask: Vec<bool>) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn direction(&self) -> &DVector<f64> {
        &self.direction
    }

    pub fn force(&self) -> f64 {
        self.force
    }

    fn active(&self, particles: &Particles) -> Vec<bool> {
        user_mask(particles, self.mask.as_deref())
    }

    fn apply(&self, particles: &mut Particles) {
        let mask = self.active(particles);
        let Particles { a, mass, .. } = particles;
        for ((mut col, m), on) in a.column_iter_mut().zip(mass.iter()).zip(mask) {
            if on {
                col.axpy(self.force / m, &self.direction, 1.0);
            }
        }
    }
}

impl Field for ConstantForce {
    fn validate(&self, particles: &Particles) -> Result<()> {
        check_dimensions(particles, self.direction.len())?;
        check_mask(particles, self.mask.as_deref())
    }

    fn mask(&self, particles: &Particles) -> Result<Vec<bool>> {
        self.validate(particles)?;
        Ok(self.active(particles))
    }

    fn accelerate(&self, particles: &mut Particles) -> Result<()> {
        self.validate(particles)?;
        self.apply(particles);
        Ok(())
    }
}

/// Constant acceleration of fixed magnitude and direction, independent of mass
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantAcceleration {
    direction: DVector<f64>, // unit vector
    acceleration: f64,
    mask: Option<Vec<bool>>,
}

impl ConstantAcceleration {
    pub fn new(direction: &[f64], acceleration: f64) -> Result<Self> {
        Ok(Self {
            direction: normalise(direction)?,
            acceleration,
            mask: None,
        })
    }

    pub fn with_mask(mut self, mask: Vec<bool>) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn direction(&self) -> &DVector<f64> {
        &self.direction
    }

    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    fn active(&self, particles: &Particles) -> Vec<bool> {
        user_mask(particles, self.mask.as_deref())
    }

    fn apply(&self, particles: &mut Particles) {
        let mask = self.active(particles);
        let delta = &self.direction * self.acceleration;
        for (mut col, on) in particles.a.column_iter_mut().zip(mask) {
            if on {
                col += &delta;
            }
        }
    }
}

impl Field for ConstantAcceleration {
    fn validate(&self, particles: &Particles) -> Result<()> {
        check_dimensions(particles, self.direction.len())?;
        check_mask(particles, self.mask.as_deref())
    }

    fn mask(&self, particles: &Particles) -> Result<Vec<bool>> {
        self.validate(particles)?;
        Ok(self.active(particles))
    }

    fn accelerate(&self, particles: &mut Particles) -> Result<()> {
        self.validate(particles)?;
        self.apply(particles);
        Ok(())
    }
}

/// One-sided hard wall through `position` with outward `normal`
///
/// Particles strictly behind the plane, `(pos - position) . normal < 0`, get a
/// large acceleration along the normal. This is a stiff-spring approximation of
/// a reflecting boundary: normal velocity is never reversed or zeroed, it is
/// only pushed back by a very large force on the next steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    position: DVector<f64>,
    normal: DVector<f64>, // unit vector
    stiffness: f64,
    mask: Option<Vec<bool>>,
}

impl Wall {
    pub fn new(position: &[f64], normal: &[f64]) -> Result<Self> {
        if position.len() != normal.len() {
            return Err(SimError::DimensionMismatch {
                expected: normal.len(),
                found: position.len(),
            });
        }
        Ok(Self {
            position: DVector::from_column_slice(position),
            normal: normalise(normal)?,
            stiffness: DEFAULT_WALL_STIFFNESS,
            mask: None,
        })
    }

    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Only particles with a `true` entry can be pushed by the wall
    pub fn with_mask(mut self, mask: Vec<bool>) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn position(&self) -> &DVector<f64> {
        &self.position
    }

    pub fn normal(&self) -> &DVector<f64> {
        &self.normal
    }

    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Behind the plane: `pos . n < position . n`, evaluated for all particles at once
    fn active(&self, particles: &Particles) -> Vec<bool> {
        let offset = self.position.dot(&self.normal);
        let depth = particles.pos.tr_mul(&self.normal);
        user_mask(particles, self.mask.as_deref())
            .into_iter()
            .zip(depth.iter())
            .map(|(on, d)| on && *d < offset)
            .collect()
    }

    fn apply(&self, particles: &mut Particles) {
        let mask = self.active(particles);
        for (mut col, on) in particles.a.column_iter_mut().zip(mask) {
            if on {
                col.axpy(self.stiffness, &self.normal, 1.0);
            }
        }
    }
}

impl Field for Wall {
    fn validate(&self, particles: &Particles) -> Result<()> {
        check_dimensions(particles, self.position.len())?;
        check_dimensions(particles, self.normal.len())?;
        check_mask(particles, self.mask.as_deref())
    }

    fn mask(&self, particles: &Particles) -> Result<Vec<bool>> {
        self.validate(particles)?;
        Ok(self.active(particles))
    }

    fn accelerate(&self, particles: &mut Particles) -> Result<()> {
        self.validate(particles)?;
        self.apply(particles);
        Ok(())
    }
}

/// Power-law potential well in two dimensions
///
/// Per axis, `f = -sign(d) * (d / c)^depth` with `d = x - c`, applied as `f / mass`.
#[derive(Debug, Clone, PartialEq)]
pub struct Well2D {
    depth: f64,
    center: (f64, f64),
    mask: Option<Vec<bool>>,
}

impl Well2D {
    /// Both centre coordinates must be non-zero; they divide the offset
    pub fn new(depth: f64, center: (f64, f64)) -> Result<Self> {
        if center.0 == 0.0 || center.1 == 0.0 {
            return Err(SimError::DegenerateWellCenter(center.0, center.1));
        }
        Ok(Self {
            depth,
            center,
            mask: None,
        })
    }

    pub fn with_mask(mut self, mask: Vec<bool>) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    /// Force components `(fx, fy)` on a particle at `(x, y)`
    pub fn force_at(&self, x: f64, y: f64) -> (f64, f64) {
        let (cx, cy) = self.center;
        let (dx, dy) = (x - cx, y - cy);
        let fx = -sign(dx) * (dx / cx).powf(self.depth);
        let fy = -sign(dy) * (dy / cy).powf(self.depth);
        (fx, fy)
    }

    fn active(&self, particles: &Particles) -> Vec<bool> {
        user_mask(particles, self.mask.as_deref())
    }

    fn apply(&self, particles: &mut Particles) {
        let mask = self.active(particles);
        let Particles { pos, a, mass, .. } = particles;
        for (j, on) in mask.into_iter().enumerate() {
            if !on {
                continue;
            }
            let (fx, fy) = self.force_at(pos[(0, j)], pos[(1, j)]);
            a[(0, j)] += fx / mass[j];
            a[(1, j)] += fy / mass[j];
        }
    }
}

impl Field for Well2D {
    fn validate(&self, particles: &Particles) -> Result<()> {
        if particles.dimensions() != 2 {
            return Err(SimError::RequiresDimensions {
                field: "well2d",
                required: 2,
                found: particles.dimensions(),
            });
        }
        check_mask(particles, self.mask.as_deref())
    }

    fn mask(&self, particles: &Particles) -> Result<Vec<bool>> {
        self.validate(particles)?;
        Ok(self.active(particles))
    }

    fn accelerate(&self, particles: &mut Particles) -> Result<()> {
        self.validate(particles)?;
        self.apply(particles);
        Ok(())
    }
}

/// A single force contributor. Each law is one tagged case
#[derive(Debug, Clone, PartialEq)]
pub enum Force {
    ConstantForce(ConstantForce),
    ConstantAcceleration(ConstantAcceleration),
    Wall(Wall),
    Well2D(Well2D),
}

impl Force {
    pub fn name(&self) -> &'static str {
        match self {
            Force::ConstantForce(_) => "constant_force",
            Force::ConstantAcceleration(_) => "constant_acceleration",
            Force::Wall(_) => "wall",
            Force::Well2D(_) => "well2d",
        }
    }

    /// Add this term's acceleration to a store it has already been validated against
    pub(crate) fn apply(&self, particles: &mut Particles) {
        match self {
            Force::ConstantForce(f) => f.apply(particles),
            Force::ConstantAcceleration(f) => f.apply(particles),
            Force::Wall(f) => f.apply(particles),
            Force::Well2D(f) => f.apply(particles),
        }
    }
}

impl Field for Force {
    fn validate(&self, particles: &Particles) -> Result<()> {
        match self {
            Force::ConstantForce(f) => f.validate(particles),
            Force::ConstantAcceleration(f) => f.validate(particles),
            Force::Wall(f) => f.validate(particles),
            Force::Well2D(f) => f.validate(particles),
        }
    }

    fn mask(&self, particles: &Particles) -> Result<Vec<bool>> {
        match self {
            Force::ConstantForce(f) => f.mask(particles),
            Force::ConstantAcceleration(f) => f.mask(particles),
            Force::Wall(f) => f.mask(particles),
            Force::Well2D(f) => f.mask(particles),
        }
    }

    fn accelerate(&self, particles: &mut Particles) -> Result<()> {
        self.validate(particles)?;
        self.apply(particles);
        Ok(())
    }
}

impl From<ConstantForce> for Force {
    fn from(f: ConstantForce) -> Self {
        Force::ConstantForce(f)
    }
}

impl From<ConstantAcceleration> for Force {
    fn from(f: ConstantAcceleration) -> Self {
        Force::ConstantAcceleration(f)
    }
}

impl From<Wall> for Force {
    fn from(f: Wall) -> Self {
        Force::Wall(f)
    }
}

impl From<Well2D> for Force {
    fn from(f: Well2D) -> Self {
        Force::Well2D(f)
    }
}

/// Ordered collection of acceleration terms (walls, wells, gravity-like fields, ...)
/// Their contributions are summed into `a` for every particle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccelSet {
    terms: Vec<Force>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Into<Force>) -> Self {
        self.terms.push(term.into());
        self
    }

    pub fn push(&mut self, term: impl Into<Force>) {
        self.terms.push(term.into());
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Force> {
        self.terms.iter()
    }

    /// Validate every term against `particles`, stopping at the first failure
    pub fn validate(&self, particles: &Particles) -> Result<()> {
        for term in &self.terms {
            term.validate(particles)?;
            debug!("attached {} field", term.name());
        }
        Ok(())
    }

    /// Zero `particles.a`, then add every term's contribution in order
    ///
    /// Every term is validated first; on error `particles` is left untouched.
    pub fn accumulate_accels(&self, particles: &mut Particles) -> Result<()> {
        for term in &self.terms {
            term.validate(particles)?;
        }
        self.accumulate_validated(particles);
        Ok(())
    }

    /// Same as [`AccelSet::accumulate_accels`] for a store already checked by [`AccelSet::validate`]
    pub(crate) fn accumulate_validated(&self, particles: &mut Particles) {
        particles.zero_acceleration();
        for term in &self.terms {
            trace!("accelerate: {}", term.name());
            term.apply(particles);
        }
    }
}

impl FromIterator<Force> for AccelSet {
    fn from_iter<I: IntoIterator<Item = Force>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(-3.0), -1.0);
        assert_eq!(sign(2.5), 1.0);
    }

    #[test]
    fn normalise_rejects_zero_vector() {
        assert_eq!(normalise(&[0.0, 0.0]), Err(SimError::ZeroLengthVector));
        let unit = normalise(&[3.0, 4.0]).unwrap();
        assert!((unit.norm() - 1.0).abs() < 1e-12);
    }
}
