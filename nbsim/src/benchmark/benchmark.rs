//! Integrator throughput and accuracy benchmark
//!
//! Builds deterministic clouds of bodies, runs every integrator on an
//! identical copy, and reports the mean wall-clock time per step together
//! with the energy drift accumulated over the run. Timing lives here only,
//! the engine itself never reads the clock.

use std::time::Instant;

use serde::Serialize;

use crate::error::Result;
use crate::simulation::engine::Engine;
use crate::simulation::integrator::Integrator;
use crate::simulation::params::Parameters;
use crate::simulation::states::Body;
use crate::simulation::vector::NVec3;

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub n: usize,                 // body count
    pub integrator: Integrator,   // scheme under test
    pub steps: u64,               // timed steps
    pub force_evaluations: u64,   // acceleration sweeps over the timed steps
    pub ms_per_step: f64,         // mean wall-clock per step
    pub energy_drift_percent: f64, // signed energy drift after the timed steps
}

/// Helper to build a cloud of `n` unit masses, no rand needed
pub fn make_bodies(n: usize) -> Result<Vec<Body>> {
    let mut bodies = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions
        let x = NVec3::new(
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0,
            (i_f * 0.07).sin() * 5.0,
        );
        // slow rotation about z so the cloud does not just collapse
        let v = 0.1 * NVec3::new(-x.y, x.x, 0.0);

        bodies.push(Body::new(1.0, x, v, format!("b{i}"), "white")?);
    }

    Ok(bodies)
}

/// Benchmark parameters in simulation units
fn make_params() -> Parameters {
    Parameters {
        h0: 0.001,
        eps: 1.0e-2,
        G: 0.1,
        max_trail_length: 1,
        snapshot_interval: u64::MAX,
    }
}

/// Time every integrator for each body count in `sizes`
pub fn bench_integrators(sizes: &[usize], steps: u64) -> Result<Vec<BenchResult>> {
    let mut results = Vec::with_capacity(sizes.len() * Integrator::ALL.len());

    for &n in sizes {
        let bodies = make_bodies(n)?;

        for integrator in Integrator::ALL {
            let mut engine = Engine::new(make_params(), integrator)?;
            engine.add_bodies(bodies.clone())?;

            // Warm-up, also records the step-0 baseline
            engine.step()?;

            let t0 = Instant::now();
            engine.run(steps)?;
            let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

            let analysis = engine.get_conservation_analysis()?;

            results.push(BenchResult {
                n,
                integrator,
                steps,
                force_evaluations: steps * integrator.evaluations() as u64,
                ms_per_step: elapsed_ms / steps.max(1) as f64,
                energy_drift_percent: analysis.energy.drift_percent,
            });
        }
    }

    Ok(results)
}
