//! 3D vector primitive used throughout the physics path
//!
//! Positions, velocities and accelerations are `nalgebra::Vector3<f64>`.
//! nalgebra already gives add, subtract, scale, dot, cross and norm; this
//! module adds the two checks the engine needs on top of that:
//! a fail-fast normalize and a finiteness test.

use nalgebra::Vector3;

use crate::error::{Result, SimError};

pub type NVec3 = Vector3<f64>;

pub trait VectorExt {
    /// Unit vector in the same direction.
    /// Fails with [`SimError::DegenerateVector`] when the magnitude is zero
    fn unit(&self) -> Result<NVec3>;

    /// True when every component is finite
    fn all_finite(&self) -> bool;
}

impl VectorExt for NVec3 {
    fn unit(&self) -> Result<NVec3> {
        let mag = self.norm();
        if mag == 0.0 || !mag.is_finite() {
            return Err(SimError::DegenerateVector);
        }
        Ok(self / mag)
    }

    fn all_finite(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }
}
