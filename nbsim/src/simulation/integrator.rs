//! Fixed-step time integrators for the N-body system
//!
//! Three schemes, all driven through the [`Acceleration`] trait:
//! - explicit Euler (1 force evaluation per step)
//! - classical RK4 (4 evaluations per step)
//! - leapfrog in kick-drift-kick velocity-Verlet form (2 evaluations per step)
//!
//! Every step advances `sys.t` by exactly `dt`. A negative `dt` integrates
//! backward in time

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::forces::Acceleration;
use super::states::System;
use super::vector::NVec3;
use crate::error::SimError;

/// Which integrator the engine uses
/// `integrator: "euler"`, `"rk4"` or `"leapfrog"`
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integrator {
    #[serde(rename = "euler")] // Explicit Euler, first order, energy drifts steadily
    Euler,

    #[default]
    #[serde(rename = "rk4")] // Classical 4th-order Runge-Kutta, accurate per step but not symplectic
    Rk4,

    #[serde(rename = "leapfrog")] // Velocity-Verlet, symplectic, bounded long-term energy error
    Leapfrog,
}

impl Integrator {
    pub const ALL: [Integrator; 3] = [Integrator::Euler, Integrator::Rk4, Integrator::Leapfrog];

    pub fn name(&self) -> &'static str {
        match self {
            Integrator::Euler => "euler",
            Integrator::Rk4 => "rk4",
            Integrator::Leapfrog => "leapfrog",
        }
    }

    /// Force evaluations per step
    pub fn evaluations(&self) -> usize {
        match self {
            Integrator::Euler => 1,
            Integrator::Rk4 => 4,
            Integrator::Leapfrog => 2,
        }
    }

    /// Advance `sys` by one step of size `dt`
    pub fn step<F>(&self, sys: &mut System, forces: &F, dt: f64)
    where
        F: Acceleration + ?Sized,
    {
        match self {
            Integrator::Euler => euler_step(sys, forces, dt),
            Integrator::Rk4 => rk4_step(sys, forces, dt),
            Integrator::Leapfrog => verlet_step(sys, forces, dt),
        }
    }
}

impl FromStr for Integrator {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euler" => Ok(Integrator::Euler),
            "rk4" => Ok(Integrator::Rk4),
            "leapfrog" | "verlet" => Ok(Integrator::Leapfrog),
            other => Err(SimError::Configuration(format!(
                "unknown integration method '{other}', expected one of: euler, rk4, leapfrog"
            ))),
        }
    }
}

impl fmt::Display for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Advance the system by one explicit Euler step
///
/// v_n+1 = v_n + dt a(x_n)
/// x_n+1 = x_n + dt v_n    (old velocity, not v_n+1)
pub fn euler_step<F>(sys: &mut System, forces: &F, dt: f64)
where
    F: Acceleration + ?Sized,
{
    let n = sys.bodies.len();
    if n == 0 { // no bodies, only the clock moves
        sys.t += dt;
        return;
    }

    let masses = sys.masses();
    let x = sys.positions();

    // a_n at x_n
    let mut a = vec![NVec3::zeros(); n];
    forces.acceleration(&masses, &x, &mut a);

    for (b, a) in sys.bodies.iter_mut().zip(a.iter()) {
        let v_old = b.v;
        b.v += dt * *a;
        b.x += dt * v_old;
        b.a = *a;
    }

    sys.t += dt;
}

/// Advance the system by one classical RK4 step
///
/// The state is the pair (x, v) for every body, with derivative (v, a(x)).
/// Each stage is built from the start-of-step state plus the previous
/// stage's slope, into its own buffers
pub fn rk4_step<F>(sys: &mut System, forces: &F, dt: f64)
where
    F: Acceleration + ?Sized,
{
    let n = sys.bodies.len();
    if n == 0 {
        sys.t += dt;
        return;
    }
    let half_dt = 0.5 * dt;

    let masses = sys.masses();
    let x0 = sys.positions();
    let v0 = sys.velocities();

    // Stage state: x0 + h * kx, v0 + h * kv
    let stage = |kx: &[NVec3], kv: &[NVec3], h: f64| -> (Vec<NVec3>, Vec<NVec3>) {
        let x = x0.iter().zip(kx).map(|(x, k)| *x + h * *k).collect();
        let v = v0.iter().zip(kv).map(|(v, k)| *v + h * *k).collect();
        (x, v)
    };

    // k1 at (x0, v0)
    let k1x = v0.clone();
    let mut k1v = vec![NVec3::zeros(); n];
    forces.acceleration(&masses, &x0, &mut k1v);

    // k2 at state + dt/2 k1
    let (x1, k2x) = stage(&k1x, &k1v, half_dt);
    let mut k2v = vec![NVec3::zeros(); n];
    forces.acceleration(&masses, &x1, &mut k2v);

    // k3 at state + dt/2 k2
    let (x2, k3x) = stage(&k2x, &k2v, half_dt);
    let mut k3v = vec![NVec3::zeros(); n];
    forces.acceleration(&masses, &x2, &mut k3v);

    // k4 at state + dt k3
    let (x3, k4x) = stage(&k3x, &k3v, dt);
    let mut k4v = vec![NVec3::zeros(); n];
    forces.acceleration(&masses, &x3, &mut k4v);

    // Weights 1, 2, 2, 1 scaled by dt/6
    let w = dt / 6.0;
    for (i, b) in sys.bodies.iter_mut().enumerate() {
        b.x = x0[i] + w * (k1x[i] + 2.0 * k2x[i] + 2.0 * k3x[i] + k4x[i]);
        b.v = v0[i] + w * (k1v[i] + 2.0 * k2v[i] + 2.0 * k3v[i] + k4v[i]);
        b.a = k1v[i];
    }

    sys.t += dt;
}

/// One leapfrog step, velocity-Verlet ordering
///
/// Half kick with a(x_n), full drift, half kick with a(x_n+1). Leaves
/// `b.a` holding the end-of-step acceleration
pub fn verlet_step<F>(sys: &mut System, forces: &F, dt: f64)
where
    F: Acceleration + ?Sized,
{
    let n = sys.bodies.len();
    if n == 0 {
        sys.t += dt;
        return;
    }
    let half_dt = 0.5 * dt;

    let masses = sys.masses();

    let mut a_start = vec![NVec3::zeros(); n];
    forces.acceleration(&masses, &sys.positions(), &mut a_start);

    // velocities now sit at t + dt/2
    for (b, a) in sys.bodies.iter_mut().zip(a_start.iter()) {
        b.v += half_dt * *a;
    }

    // positions move a whole step on the mid-step velocity
    for b in sys.bodies.iter_mut() {
        b.x += dt * b.v;
    }
    sys.t += dt;

    let mut a_end = vec![NVec3::zeros(); n];
    forces.acceleration(&masses, &sys.positions(), &mut a_end);

    // close the step with the force at the new positions
    for (b, a) in sys.bodies.iter_mut().zip(a_end.iter()) {
        b.v += half_dt * *a;
        b.a = *a;
    }
}
