//! Runtime engine
//!
//! Owns the body collection, the active integrator, the simulation clock and
//! the conservation history. An engine is configured (bodies, dt, integrator)
//! and can then be stepped any number of times; there is no finished state.
//!
//! Each `step` delegates to the integrator, checks that every body and every
//! conserved quantity is still finite, records a [`ConservationSnapshot`] of
//! the post-step state and appends the new positions to the body trails.

use log::{debug, info, trace, warn};
use serde::Serialize;

use crate::error::{Result, SimError};
use crate::simulation::forces::NewtonianGravity;
use crate::simulation::integrator::Integrator;
use crate::simulation::params::{check_gravitational_constant, check_softening, check_time_step, Parameters};
use crate::simulation::states::{Body, BodySnapshot, System};
use crate::simulation::vector::{NVec3, VectorExt};

/// Energy and momentum of the whole system at one step
#[derive(Debug, Clone, Serialize)]
pub struct ConservationSnapshot {
    pub step: u64,              // step index, 0 is the initial state
    pub time: f64,              // simulated time
    pub kinetic: f64,           // total kinetic energy
    pub potential: f64,         // total softened potential energy
    pub total: f64,             // kinetic + potential
    pub momentum: NVec3,        // total linear momentum
    pub angular_momentum: NVec3, // total angular momentum about the origin
}

/// Change of one conserved quantity between the baseline and now
#[derive(Debug, Clone, Serialize)]
pub struct Drift {
    pub initial: f64,
    pub current: f64,
    pub absolute: f64,      // |current - initial|, or |L_t - L_0| for vectors
    pub drift_percent: f64, // (current - initial) / |initial| * 100, 0 when initial is 0
}

impl Drift {
    fn scalar(initial: f64, current: f64) -> Self {
        Self {
            initial,
            current,
            absolute: (current - initial).abs(),
            drift_percent: percent(initial, current),
        }
    }

    fn vector(initial: NVec3, current: NVec3) -> Self {
        let (i, c) = (initial.norm(), current.norm());
        Self {
            initial: i,
            current: c,
            absolute: (current - initial).norm(),
            drift_percent: percent(i, c),
        }
    }
}

fn percent(initial: f64, current: f64) -> f64 {
    if initial == 0.0 {
        return 0.0;
    }
    (current - initial) / initial.abs() * 100.0
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationInfo {
    pub time: f64,
    pub steps: u64,
    pub dt: f64,
    pub integrator: Integrator,
}

/// Result of [`Engine::get_conservation_analysis`]
#[derive(Debug, Clone, Serialize)]
pub struct ConservationAnalysis {
    pub energy: Drift,
    pub momentum: Drift,
    pub angular_momentum: Drift,
    pub simulation: SimulationInfo,
}

#[derive(Debug, Clone)]
pub struct Engine {
    system: System,                       // bodies + clock
    gravity: NewtonianGravity,            // force model
    integrator: Integrator,               // active scheme
    parameters: Parameters,               // dt, G, eps, trail length, sampling
    step_count: u64,                      // steps taken since the last reset
    history: Vec<ConservationSnapshot>,   // step 0 first
}

impl Default for Engine {
    fn default() -> Self {
        let parameters = Parameters::default();
        Self {
            system: System::default(),
            gravity: NewtonianGravity::new(parameters.G, parameters.eps),
            integrator: Integrator::default(),
            parameters,
            step_count: 0,
            history: Vec::new(),
        }
    }
}

impl Engine {
    pub fn new(parameters: Parameters, integrator: Integrator) -> Result<Self> {
        parameters.validate()?;
        Ok(Self {
            gravity: NewtonianGravity::new(parameters.G, parameters.eps),
            integrator,
            parameters,
            ..Self::default()
        })
    }

    /// Append bodies to the managed collection
    ///
    /// Fails without adding anything if an incoming body is invalid or if
    /// two bodies (new or already present) share an identical position.
    /// Adding bodies after stepping drops the conservation history, the next
    /// step records a fresh baseline
    pub fn add_bodies(&mut self, bodies: impl IntoIterator<Item = Body>) -> Result<()> {
        let mut incoming: Vec<Body> = bodies.into_iter().collect();

        for b in &incoming {
            b.validate()?;
        }

        for (k, new) in incoming.iter().enumerate() {
            let mut earlier = self.system.bodies.iter().chain(incoming[..k].iter());
            if let Some(other) = earlier.find(|b| b.x == new.x) {
                return Err(SimError::DuplicateBody {
                    first: other.name.clone(),
                    second: new.name.clone(),
                });
            }
        }

        for b in incoming.iter_mut() {
            b.trail.set_capacity(self.parameters.max_trail_length);
        }

        debug!("adding {} bodies ({} already present)", incoming.len(), self.system.bodies.len());
        self.system.bodies.extend(incoming);

        if !self.history.is_empty() {
            warn!("bodies added after step {}, conservation history reset", self.step_count);
            self.history.clear();
        }
        Ok(())
    }

    /// `dt` must be finite and nonzero, negative integrates backward
    pub fn set_time_step(&mut self, dt: f64) -> Result<()> {
        check_time_step(dt)?;
        self.parameters.h0 = dt;
        Ok(())
    }

    pub fn set_integration_method(&mut self, integrator: Integrator) {
        debug!("integrator {} -> {}", self.integrator, integrator);
        self.integrator = integrator;
    }

    #[allow(non_snake_case)]
    pub fn set_gravitational_constant(&mut self, G: f64) -> Result<()> {
        check_gravitational_constant(G)?;
        self.parameters.G = G;
        self.gravity.G = G;
        Ok(())
    }

    pub fn set_softening_length(&mut self, eps: f64) -> Result<()> {
        check_softening(eps)?;
        self.parameters.eps = eps;
        self.gravity.eps = eps;
        Ok(())
    }

    /// Existing trails keep their most recent entries
    pub fn set_max_trail_length(&mut self, len: usize) -> Result<()> {
        if len == 0 {
            return Err(SimError::Configuration("max_trail_length must be at least 1".into()));
        }
        self.parameters.max_trail_length = len;
        for b in self.system.bodies.iter_mut() {
            b.trail.set_capacity(len);
        }
        Ok(())
    }

    pub fn set_snapshot_interval(&mut self, every: u64) -> Result<()> {
        if every == 0 {
            return Err(SimError::Configuration("snapshot_interval must be at least 1".into()));
        }
        self.parameters.snapshot_interval = every;
        Ok(())
    }

    /// Advance by one `dt`
    ///
    /// On a non-finite result (state or conserved quantities) the bodies
    /// and clock are restored to their pre-step values and
    /// `NumericalInstability` is returned
    pub fn step(&mut self) -> Result<()> {
        if self.system.bodies.is_empty() {
            return Err(SimError::Configuration("no bodies to integrate".into()));
        }
        if self.history.is_empty() {
            let baseline = self.measure();
            if let Some(i) = self.unstable_body(&baseline) {
                return Err(self.instability(self.step_count, i));
            }
            self.history.push(baseline);
        }

        let dt = self.parameters.h0;

        // Pre-step state, restored if the step blows up
        let t_prev = self.system.t;
        let saved: Vec<(NVec3, NVec3, NVec3)> = self.system.bodies.iter().map(|b| (b.x, b.v, b.a)).collect();

        self.integrator.step(&mut self.system, &self.gravity, dt);

        let snapshot = self.measure();
        if let Some(i) = self.unstable_body(&snapshot) {
            for (b, (x, v, a)) in self.system.bodies.iter_mut().zip(saved) {
                b.x = x;
                b.v = v;
                b.a = a;
            }
            self.system.t = t_prev;
            return Err(self.instability(self.step_count + 1, i));
        }

        self.step_count += 1;
        trace!("step {} t = {:.6e}", self.step_count, self.system.t);

        if self.step_count % self.parameters.snapshot_interval == 0 {
            self.history.push(ConservationSnapshot { step: self.step_count, ..snapshot });
        }

        for b in self.system.bodies.iter_mut() {
            b.trail.push(b.x);
        }
        Ok(())
    }

    /// Call [`Engine::step`] `n` times
    ///
    /// Returns the number of steps taken. Stops at the first unstable step,
    /// reporting how many steps of this run completed before it
    pub fn run(&mut self, n: u64) -> Result<u64> {
        for done in 0..n {
            if let Err(err) = self.step() {
                let err = match err {
                    SimError::NumericalInstability { step, body, .. } => {
                        warn!("run halted at step {step}: body '{body}' became non-finite after {done} steps");
                        SimError::NumericalInstability { completed: done, step, body }
                    }
                    other => other,
                };
                return Err(err);
            }
        }
        info!(
            "ran {} steps with {}, t = {:.6e}, {} bodies",
            n,
            self.integrator,
            self.system.t,
            self.system.bodies.len()
        );
        Ok(n)
    }

    /// Step until simulated time has moved by at least `duration`
    /// in the direction of `dt`
    pub fn run_for_duration(&mut self, duration: f64) -> Result<u64> {
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(SimError::Configuration(format!("duration must be finite and non-negative, got {duration}")));
        }
        let steps = (duration / self.parameters.h0.abs()).ceil() as u64;
        self.run(steps)
    }

    /// Drift of energy, momentum and angular momentum since step 0
    pub fn get_conservation_analysis(&self) -> Result<ConservationAnalysis> {
        let initial = self.history.first().ok_or(SimError::NoBaseline)?;
        let current = self.measure();
        if let Some(i) = self.unstable_body(&current) {
            return Err(self.instability(self.step_count, i));
        }

        Ok(ConservationAnalysis {
            energy: Drift::scalar(initial.total, current.total),
            momentum: Drift::vector(initial.momentum, current.momentum),
            angular_momentum: Drift::vector(initial.angular_momentum, current.angular_momentum),
            simulation: SimulationInfo {
                time: self.system.t,
                steps: self.step_count,
                dt: self.parameters.h0,
                integrator: self.integrator,
            },
        })
    }

    /// Restart the clock and history from the current body state
    pub fn reset(&mut self) {
        self.system.t = 0.0;
        self.step_count = 0;
        self.history.clear();
        for b in self.system.bodies.iter_mut() {
            b.trail.clear();
            b.trail.push(b.x);
        }
        let baseline = self.measure();
        if !self.system.bodies.is_empty() && self.unstable_body(&baseline).is_none() {
            self.history.push(baseline);
        }
    }

    /// Index of the body to blame when the state or a conserved quantity is
    /// not finite. A non-finite total with every body finite on its own
    /// (overflowing sum or potential) is charged to the first body
    fn unstable_body(&self, snapshot: &ConservationSnapshot) -> Option<usize> {
        if let Some(i) = self.system.first_non_finite() {
            return Some(i);
        }
        let finite = snapshot.kinetic.is_finite()
            && snapshot.potential.is_finite()
            && snapshot.total.is_finite()
            && snapshot.momentum.all_finite()
            && snapshot.angular_momentum.all_finite();
        if finite {
            return None;
        }
        Some(self.system.bodies.iter().position(|b| !b.derived_finite()).unwrap_or(0))
    }

    fn instability(&self, step: u64, i: usize) -> SimError {
        SimError::NumericalInstability {
            completed: 0,
            step,
            body: self.system.bodies[i].name.clone(),
        }
    }

    fn measure(&self) -> ConservationSnapshot {
        let kinetic = self.system.kinetic_energy();
        let potential = self.gravity.potential_energy(&self.system.bodies);
        ConservationSnapshot {
            step: self.step_count,
            time: self.system.t,
            kinetic,
            potential,
            total: kinetic + potential,
            momentum: self.system.total_momentum(),
            angular_momentum: self.system.total_angular_momentum(),
        }
    }

    // =========================================================================================
    // read-only views
    // =========================================================================================

    pub fn bodies(&self) -> &[Body] {
        &self.system.bodies
    }

    pub fn snapshots(&self) -> Vec<BodySnapshot> {
        self.system.bodies.iter().map(Body::snapshot).collect()
    }

    pub fn time(&self) -> f64 {
        self.system.t
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn history(&self) -> &[ConservationSnapshot] {
        &self.history
    }

    pub fn integrator(&self) -> Integrator {
        self.integrator
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn gravity(&self) -> &NewtonianGravity {
        &self.gravity
    }

    /// (kinetic, potential, total)
    pub fn system_energy(&self) -> (f64, f64, f64) {
        let s = self.measure();
        (s.kinetic, s.potential, s.total)
    }

    pub fn total_momentum(&self) -> NVec3 {
        self.system.total_momentum()
    }

    pub fn total_angular_momentum(&self) -> NVec3 {
        self.system.total_angular_momentum()
    }

    pub fn center_of_mass(&self) -> NVec3 {
        self.system.center_of_mass()
    }
}
