//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! containing:
//! - numerical parameters (`Parameters`)
//! - a `VelocityVerlet` integrator owning the particles (at t = 0) and the
//!   active force set (`AccelSet`)

use log::info;

use crate::configuration::config::{BodyConfig, ExtraFieldConfig, FieldConfig, ScenarioConfig};
use crate::error::{Result, SimError};
use crate::simulation::forces::{
    AccelSet, ConstantAcceleration, ConstantForce, Force, Wall, Well2D,
};
use crate::simulation::integrator::VelocityVerlet;
use crate::simulation::params::Parameters;
use crate::simulation::states::{ColumnType, ExtraField, Particles};

/// A simulation ready to run: parameters plus the integrator holding all state
#[derive(Debug, Clone)]
pub struct Scenario {
    pub parameters: Parameters,
    pub integrator: VelocityVerlet,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            h0: p_cfg.h0,
            t_end: p_cfg.t_end,
            log_every: p_cfg.log_every,
        };

        // Extra columns: raw YAML pairs -> typed declarations
        let extra_fields = cfg
            .particles
            .extra_fields
            .iter()
            .map(extra_field_from_config)
            .collect::<Result<Vec<_>>>()?;

        let mut particles = Particles::new(
            cfg.particles.count,
            cfg.particles.dimensions,
            &extra_fields,
        )?;

        // Initial state: body `k` configures particle `k`
        for (k, body) in cfg.particles.bodies.iter().enumerate() {
            apply_body(&mut particles, k, body)?;
        }

        // Forces: one term per configured field, in file order
        let forces = cfg
            .fields
            .iter()
            .map(force_from_config)
            .collect::<Result<AccelSet>>()?;

        let integrator = VelocityVerlet::new(particles, forces, parameters.h0)?;

        Ok(Self {
            parameters,
            integrator,
        })
    }

    /// Step until `t_end`, logging progress every `log_every` steps
    pub fn run(&mut self) -> u64 {
        let Scenario {
            parameters,
            integrator,
        } = self;

        let start = integrator.steps();
        while integrator.t() + 0.5 * parameters.h0 < parameters.t_end {
            integrator.step();
            let taken = integrator.steps();
            if parameters.log_every > 0 && taken % parameters.log_every == 0 {
                info!(
                    "t = {:.4}, steps = {taken}, kinetic energy = {:.6e}",
                    integrator.t(),
                    integrator.kinetic_energy()
                );
            }
        }
        integrator.steps() - start
    }
}

/// Turn a `[name, type]` YAML pair into an [`ExtraField`]
pub fn extra_field_from_config(cfg: &ExtraFieldConfig) -> Result<ExtraField> {
    let ExtraFieldConfig(name, dtype) = cfg;
    let name = name
        .as_str()
        .ok_or_else(|| SimError::InvalidFieldName(format!("{name:?}")))?;
    let kind = dtype
        .as_str()
        .ok_or_else(|| SimError::InvalidFieldType(format!("{dtype:?}")))?
        .parse::<ColumnType>()?;
    Ok(ExtraField::new(name, kind))
}

/// Build one force term from its configuration
pub fn force_from_config(cfg: &FieldConfig) -> Result<Force> {
    let force: Force = match cfg {
        FieldConfig::ConstantForce {
            direction,
            force,
            mask,
        } => {
            let f = ConstantForce::new(direction, *force)?;
            match mask {
                Some(m) => f.with_mask(m.clone()).into(),
                None => f.into(),
            }
        }
        FieldConfig::ConstantAcceleration {
            direction,
            acceleration,
            mask,
        } => {
            let f = ConstantAcceleration::new(direction, *acceleration)?;
            match mask {
                Some(m) => f.with_mask(m.clone()).into(),
                None => f.into(),
            }
        }
        FieldConfig::Wall {
            position,
            normal,
            stiffness,
            mask,
        } => {
            let mut f = Wall::new(position, normal)?;
            if let Some(k) = stiffness {
                f = f.with_stiffness(*k);
            }
            match mask {
                Some(m) => f.with_mask(m.clone()).into(),
                None => f.into(),
            }
        }
        FieldConfig::Well2D {
            depth,
            center,
            mask,
        } => {
            let f = Well2D::new(*depth, (center[0], center[1]))?;
            match mask {
                Some(m) => f.with_mask(m.clone()).into(),
                None => f.into(),
            }
        }
    };
    Ok(force)
}

fn apply_body(particles: &mut Particles, k: usize, body: &BodyConfig) -> Result<()> {
    if let Some(pos) = &body.pos {
        particles.set_position(k, pos)?;
    }
    if let Some(v) = &body.v {
        particles.set_velocity(k, v)?;
    }
    if let Some(m) = body.mass {
        particles.set_mass(k, m)?;
    }
    Ok(())
}
