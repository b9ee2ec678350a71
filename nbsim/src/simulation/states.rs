//! Core state types for the N-body simulation
//!
//! - `Body`   point mass with position, velocity, derived acceleration,
//!            display metadata and a bounded position trail
//! - `Trail`  fixed-capacity ring of past positions, oldest evicted first
//! - `System` the ordered list of bodies and the current simulation time `t`

use std::collections::VecDeque;

use serde::Serialize;

use crate::error::{Result, SimError};
use crate::simulation::vector::{NVec3, VectorExt};

/// Default number of past positions kept per body
pub const DEFAULT_TRAIL_LENGTH: usize = 100;

/// Bounded history of past positions
///
/// Pushing past capacity drops the oldest entry, so the trail always holds
/// the most recent `capacity` positions in chronological order
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<NVec3>,
    capacity: usize,
}

impl Trail {
    /// A zero capacity is clamped to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, x: NVec3) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(x);
    }

    /// Change the capacity, dropping the oldest entries if the trail shrinks
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &NVec3> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<NVec3> {
        self.points.iter().copied().collect()
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,   // display name, also used in error messages
    pub color: String,  // display colour, ignored by physics
    pub radius: f64,    // display radius, ignored by physics
    pub m: f64,         // mass
    pub x: NVec3,       // position
    pub v: NVec3,       // velocity
    pub a: NVec3,       // acceleration from the last force evaluation
    pub trail: Trail,   // recent positions
}

impl Body {
    /// Build a body, rejecting non-positive mass and non-finite state.
    /// The trail starts with the initial position
    pub fn new(m: f64, x: NVec3, v: NVec3, name: impl Into<String>, color: impl Into<String>) -> Result<Self> {
        let mut trail = Trail::new(DEFAULT_TRAIL_LENGTH);
        trail.push(x);

        let body = Self {
            name: name.into(),
            color: color.into(),
            radius: 1.0,
            m,
            x,
            v,
            a: NVec3::zeros(),
            trail,
        };
        body.validate()?;
        Ok(body)
    }

    /// Mass positive and finite, position and velocity finite, and the
    /// derived kinetic energy, momentum and angular momentum representable
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| SimError::InvalidBody { name: self.name.clone(), reason };

        if !(self.m.is_finite() && self.m > 0.0) {
            return Err(invalid(format!("mass must be positive and finite, got {}", self.m)));
        }
        if !self.x.all_finite() {
            return Err(invalid("position is not finite".into()));
        }
        if !self.v.all_finite() {
            return Err(invalid("velocity is not finite".into()));
        }
        if !self.derived_finite() {
            return Err(invalid("kinetic energy or momentum overflows".into()));
        }
        Ok(())
    }

    /// Set the display radius
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.m * self.v.norm_squared()
    }

    pub fn momentum(&self) -> NVec3 {
        self.m * self.v
    }

    /// Angular momentum about the origin: x × p
    pub fn angular_momentum(&self) -> NVec3 {
        self.x.cross(&self.momentum())
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (other.x - self.x).norm()
    }

    /// Position and velocity are both finite
    pub fn is_finite(&self) -> bool {
        self.x.all_finite() && self.v.all_finite()
    }

    /// Kinetic energy, momentum and angular momentum are all finite
    pub fn derived_finite(&self) -> bool {
        self.kinetic_energy().is_finite() && self.momentum().all_finite() && self.angular_momentum().all_finite()
    }

    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            name: self.name.clone(),
            position: self.x,
            velocity: self.v,
            trail: self.trail.to_vec(),
        }
    }
}

/// Read-only copy of a body's state handed to renderers and reports
#[derive(Debug, Clone, Serialize)]
pub struct BodySnapshot {
    pub name: String,
    pub position: NVec3,
    pub velocity: NVec3,
    pub trail: Vec<NVec3>,
}

#[derive(Debug, Clone, Default)]
pub struct System {
    pub bodies: Vec<Body>, // collection of bodies, order fixed for a run
    pub t: f64,            // time
}

impl System {
    pub fn masses(&self) -> Vec<f64> {
        self.bodies.iter().map(|b| b.m).collect()
    }

    pub fn positions(&self) -> Vec<NVec3> {
        self.bodies.iter().map(|b| b.x).collect()
    }

    pub fn velocities(&self) -> Vec<NVec3> {
        self.bodies.iter().map(|b| b.v).collect()
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    pub fn total_momentum(&self) -> NVec3 {
        self.bodies.iter().fold(NVec3::zeros(), |p, b| p + b.momentum())
    }

    /// About the origin
    pub fn total_angular_momentum(&self) -> NVec3 {
        self.bodies.iter().fold(NVec3::zeros(), |l, b| l + b.angular_momentum())
    }

    /// Mass-weighted mean position, zero for an empty system
    pub fn center_of_mass(&self) -> NVec3 {
        let total: f64 = self.bodies.iter().map(|b| b.m).sum();
        if total == 0.0 {
            return NVec3::zeros();
        }
        self.bodies.iter().fold(NVec3::zeros(), |c, b| c + b.m * b.x) / total
    }

    /// Index of the first body whose position or velocity is not finite
    pub fn first_non_finite(&self) -> Option<usize> {
        self.bodies.iter().position(|b| !b.is_finite())
    }
}
