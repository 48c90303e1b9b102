//! Numerical parameters for a simulation run
//!
//! `Parameters` holds runtime settings:
//! - fixed integration step size,
//! - end time,
//! - how often the driver logs progress

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub h0: f64, // step size
    pub t_end: f64, // time end
    pub log_every: u64, // steps between progress logs, 0 = never
}
