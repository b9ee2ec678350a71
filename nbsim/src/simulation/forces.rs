//! Force / acceleration evaluation for the n-body engine
//!
//! Defines the [`Acceleration`] trait the integrators are written against,
//! and the direct O(n^2) softened Newtonian gravity that implements it

use crate::simulation::states::Body;
use crate::simulation::vector::NVec3;

/// Source of accelerations for a set of point masses
///
/// Integrators evaluate forces on intermediate states that are not bodies
/// yet (RK4 stages), so the trait works on plain mass / position slices.
/// Implementations overwrite `out[i]` with the acceleration of body `i`
pub trait Acceleration {
    fn acceleration(&self, masses: &[f64], positions: &[NVec3], out: &mut [NVec3]);

    /// One acceleration per body, in body order
    fn accelerations(&self, bodies: &[Body]) -> Vec<NVec3> {
        let masses: Vec<f64> = bodies.iter().map(|b| b.m).collect();
        let positions: Vec<NVec3> = bodies.iter().map(|b| b.x).collect();
        let mut out = vec![NVec3::zeros(); bodies.len()];
        self.acceleration(&masses, &positions, &mut out);
        out
    }
}

/// 3D Newtonian gravity with Plummer softening (direct n^2 sum)
///
/// The softening length `eps` enters in quadrature with the separation,
/// so the pair force stays finite when two bodies nearly coincide
#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct NewtonianGravity {
    pub G: f64,   // gravitational constant
    pub eps: f64, // softening length
}

impl NewtonianGravity {
    #[allow(non_snake_case)]
    pub fn new(G: f64, eps: f64) -> Self {
        Self { G, eps }
    }

    /// Force on body `i` (mass `mi` at `xi`) from body `j` (mass `mj` at `xj`).
    /// The force on `j` from `i` is the exact negation
    pub fn pair_force(&self, mi: f64, xi: NVec3, mj: f64, xj: NVec3) -> NVec3 {
        // r points from i to j, so i is pulled along +r
        let r = xj - xi;

        // Softened squared distance: d^2 + eps^2
        let d2 = r.norm_squared() + self.eps * self.eps;

        // 1 / (d^2 + eps^2)^(3/2)
        let inv_d = d2.sqrt().recip();
        let inv_d3 = inv_d * inv_d * inv_d;

        (self.G * mi * mj * inv_d3) * r
    }

    /// Softened potential energy: U = -sum G m_i m_j / sqrt(d^2 + eps^2) over pairs
    pub fn potential_energy(&self, bodies: &[Body]) -> f64 {
        let eps2 = self.eps * self.eps;
        let mut u = 0.0;
        for (i, bi) in bodies.iter().enumerate() {
            for bj in &bodies[i + 1..] {
                let d2 = (bj.x - bi.x).norm_squared() + eps2;
                u -= self.G * bi.m * bj.m / d2.sqrt();
            }
        }
        u
    }
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, masses: &[f64], positions: &[NVec3], out: &mut [NVec3]) {
        let n = positions.len();

        // Zero buffer, forces are accumulated into it first
        for f in out.iter_mut() {
            *f = NVec3::zeros();
        }
        if n == 0 { // No bodies, return
            return;
        }

        // Each unordered pair (i, j) with i < j is evaluated once
        for i in 0..n {
            let xi = positions[i]; // position of body i
            let mi = masses[i];    // mass of body i

            for j in (i + 1)..n {
                // Force on i from j, pointing toward j
                let f = self.pair_force(mi, xi, masses[j], positions[j]);

                // Newton's third law: j feels exactly -f
                out[i] += f;
                out[j] -= f;
            }
        }

        // Accumulated force -> acceleration
        for (a, m) in out.iter_mut().zip(masses.iter()) {
            *a /= *m;
        }
    }
}
