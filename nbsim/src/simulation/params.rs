//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - integration step size `h0` (may be negative to integrate backward),
//! - softening length and gravitational constant (`eps`, `G`),
//! - trail capacity and conservation sampling interval

use crate::error::{Result, SimError};
use crate::simulation::states::DEFAULT_TRAIL_LENGTH;

/// Newtonian gravitational constant in SI units
pub const DEFAULT_G: f64 = 6.674e-11;

/// Softening length in metres, negligible at planetary separations
pub const DEFAULT_SOFTENING: f64 = 1.0e3;

/// One day in seconds
pub const DEFAULT_TIME_STEP: f64 = 86_400.0;

#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct Parameters {
    pub h0: f64,                 // step size
    pub eps: f64,                // softening length
    pub G: f64,                  // gravitational constant
    pub max_trail_length: usize, // positions kept per body
    pub snapshot_interval: u64,  // record conservation every k steps
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            h0: DEFAULT_TIME_STEP,
            eps: DEFAULT_SOFTENING,
            G: DEFAULT_G,
            max_trail_length: DEFAULT_TRAIL_LENGTH,
            snapshot_interval: 1,
        }
    }
}

impl Parameters {
    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<()> {
        check_time_step(self.h0)?;
        check_softening(self.eps)?;
        check_gravitational_constant(self.G)?;
        if self.max_trail_length == 0 {
            return Err(SimError::Configuration("max_trail_length must be at least 1".into()));
        }
        if self.snapshot_interval == 0 {
            return Err(SimError::Configuration("snapshot_interval must be at least 1".into()));
        }
        Ok(())
    }
}

pub(crate) fn check_time_step(dt: f64) -> Result<()> {
    if !dt.is_finite() || dt == 0.0 {
        return Err(SimError::Configuration(format!("time step must be finite and nonzero, got {dt}")));
    }
    Ok(())
}

pub(crate) fn check_softening(eps: f64) -> Result<()> {
    if !(eps.is_finite() && eps > 0.0) {
        return Err(SimError::Configuration(format!("softening length must be positive and finite, got {eps}")));
    }
    Ok(())
}

#[allow(non_snake_case)]
pub(crate) fn check_gravitational_constant(G: f64) -> Result<()> {
    if !G.is_finite() {
        return Err(SimError::Configuration(format!("gravitational constant must be finite, got {G}")));
    }
    Ok(())
}
