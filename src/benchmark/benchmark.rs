use std::time::Instant;

use crate::simulation::forces::{AccelSet, ConstantAcceleration, Wall};
use crate::simulation::integrator::VelocityVerlet;
use crate::simulation::states::Particles;
use crate::error::Result;

/// Helper to build a 3D store of size `n` with deterministic positions
fn make_particles(n: usize) -> Result<Particles> {
    let mut particles = Particles::new(n, 3, &[])?;

    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        particles.set_position(i, &[
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0 + 5.0,
            (i_f * 0.07).sin() * 5.0,
        ])?;
    }

    Ok(particles)
}

/// Gravity plus a floor, the cheapest non-trivial field set
fn make_forces() -> Result<AccelSet> {
    Ok(AccelSet::new()
        .with(ConstantAcceleration::new(&[0.0, 0.0, -1.0], 9.81)?)
        .with(Wall::new(&[0.0, 0.0, -5.0], &[0.0, 0.0, 1.0])?))
}

/// Time `VelocityVerlet::step` for a range of particle counts
/// Output is CSV so it can be pasted straight into a spreadsheet
pub fn bench_verlet() -> Result<()> {
    let ns = [1_000, 10_000, 100_000, 1_000_000];
    let steps = 20; // steps averaged per n

    println!("N,step_ms");

    for n in ns {
        let mut verlet = VelocityVerlet::new(make_particles(n)?, make_forces()?, 1.0e-3)?;

        // Warm up
        verlet.step();

        let t0 = Instant::now();
        verlet.run(steps);
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6}", n, ms);
    }

    Ok(())
}
