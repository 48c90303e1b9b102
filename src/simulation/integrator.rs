//! Fixed-step velocity-Verlet integrator
//!
//! `VelocityVerlet` owns the particles, the active `AccelSet` and the step
//! size. Each `step` does one kick-drift-kick update and advances `t` by
//! exactly one timestep. External code may overwrite positions or velocities
//! between steps; integration simply continues from the new state.

use log::{debug, trace};

use super::forces::AccelSet;
use super::states::Particles;
use crate::error::{Result, SimError};

#[derive(Debug, Clone)]
pub struct VelocityVerlet {
    particles: Particles,
    forces: AccelSet,
    timestep: f64,
    t: f64,
    steps: u64,
}

impl VelocityVerlet {
    /// Attach `forces` to `particles` and check both before any step is taken
    pub fn new(particles: Particles, forces: AccelSet, timestep: f64) -> Result<Self> {
        if !(timestep.is_finite() && timestep > 0.0) {
            return Err(SimError::InvalidTimestep(timestep));
        }
        forces.validate(&particles)?;
        debug!(
            "velocity verlet: {} particles, {} fields, dt={timestep}",
            particles.count(),
            forces.len()
        );

        Ok(Self {
            particles,
            forces,
            timestep,
            t: 0.0,
            steps: 0,
        })
    }

    /// Advance the system by one timestep
    ///
    /// Uses the acceleration left over from the previous step (zero on the first
    /// call unless the caller seeded `a`), then recomputes it from scratch at the
    /// new positions.
    pub fn step(&mut self) {
        let dt = self.timestep;
        let half_dt = 0.5 * dt; // half step dt/2

        // v_n+1/2 = v_n + (dt/2) * a_n
        let v_half = &self.particles.v + &self.particles.a * half_dt;

        // x_n+1 = x_n + dt * v_n+1/2
        self.particles.pos += &v_half * dt;

        // a_n+1 from x_n+1
        self.forces.accumulate_validated(&mut self.particles);

        // v_n+1 = v_n+1/2 + (dt/2) * a_n+1
        self.particles.v = v_half + &self.particles.a * half_dt;

        self.t += dt;
        self.steps += 1;
        trace!("step {} -> t={}", self.steps, self.t);
    }

    /// Take `n` steps
    pub fn run(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Step until `t` reaches `t_end` (to within half a step), returning the number of steps taken
    pub fn run_until(&mut self, t_end: f64) -> u64 {
        let start = self.steps;
        while self.t + 0.5 * self.timestep < t_end {
            self.step();
        }
        self.steps - start
    }

    /// Elapsed simulated time
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Number of steps taken so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    pub fn particles(&self) -> &Particles {
        &self.particles
    }

    /// Mutable access between steps, e.g. to drag a particle to a new position
    pub fn particles_mut(&mut self) -> &mut Particles {
        &mut self.particles
    }

    pub fn forces(&self) -> &AccelSet {
        &self.forces
    }

    pub fn into_particles(self) -> Particles {
        self.particles
    }

    /// Total kinetic energy, `sum(0.5 * m * |v|^2)`
    pub fn kinetic_energy(&self) -> f64 {
        self.particles
            .v
            .column_iter()
            .zip(self.particles.mass.iter())
            .map(|(v, m)| 0.5 * m * v.norm_squared())
            .sum()
    }
}
