//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – integrator selection
//! - [`ParametersConfig`] – step size and physical constants
//! - [`SystemConfig`]     – an optional preset plus custom bodies
//! - [`BodyConfig`]       – initial state for each custom body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario matching these types:
//!
//! ```yaml
//! engine:
//!   integrator: "leapfrog"        # euler | rk4 | leapfrog
//!
//! parameters:
//!   time_step: 3600.0             # seconds, negative runs backward
//!   gravitational_constant: 6.674e-11
//!   softening_length: 1.0e3       # metres
//!   max_trail_length: 200
//!   snapshot_interval: 1
//!
//! system:
//!   preset: "sun_earth"           # inner | full | earth_moon | sun_earth
//!   bodies:
//!     - name: "Probe"
//!       color: "white"
//!       mass: 1000.0
//!       position: [ 0.0, 2.0e11, 0.0 ]
//!       velocity: [ -25000.0, 0.0, 0.0 ]
//! ```
//!
//! Every field except `parameters.time_step` has a default. The scenario
//! builder turns this into a configured [`crate::Engine`].
//!
//! # Time scaling
//! `system.time_scale` compresses preset orbital periods by that factor. To
//! keep those orbits circular the engine runs with
//! `G = gravitational_constant * time_scale^2`, and that scaled `G` acts on
//! every body, custom bodies included. Custom velocities are taken as
//! written, so leave `time_scale` at 1 when only custom bodies are used.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SimError};
use crate::simulation::integrator::Integrator;
use crate::simulation::params::{DEFAULT_G, DEFAULT_SOFTENING};
use crate::simulation::states::DEFAULT_TRAIL_LENGTH;

/// High-level engine configuration
#[derive(Deserialize, Debug, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub integrator: Integrator, // Time integrator used for advancing the system state, rk4 if omitted
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub time_step: f64, // step size in seconds

    #[serde(default = "default_g")]
    pub gravitational_constant: f64,

    #[serde(default = "default_softening")]
    pub softening_length: f64, // prevents singular forces at very small separations

    #[serde(default = "default_trail")]
    pub max_trail_length: usize, // past positions kept per body

    #[serde(default = "default_interval")]
    pub snapshot_interval: u64, // record conservation every k steps
}

/// Which bodies make up the system
#[derive(Deserialize, Debug, Clone)]
pub struct SystemConfig {
    #[serde(default)]
    pub preset: Option<String>, // built-in body set, resolved by the scenario builder

    #[serde(default = "default_scale")]
    pub scale_factor: f64, // multiplies preset distances

    #[serde(default = "default_scale")]
    pub time_scale: f64, // divides preset orbital periods, scales G by its square

    #[serde(default)]
    pub bodies: Vec<BodyConfig>, // custom bodies, appended after the preset
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            preset: None,
            scale_factor: 1.0,
            time_scale: 1.0,
            bodies: Vec::new(),
        }
    }
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    pub mass: f64,          // kg, must be positive
    pub position: [f64; 3], // m
    pub velocity: [f64; 3], // m/s
    #[serde(default = "default_radius")]
    pub radius: f64, // display only
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig, // Engine-level configuration
    pub parameters: ParametersConfig, // Global numerical and physical parameters
    #[serde(default)]
    pub system: SystemConfig, // Bodies that define the initial state of the system
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| SimError::Configuration(format!("cannot open {}: {e}", path.display())))?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn default_g() -> f64 {
    DEFAULT_G
}

fn default_softening() -> f64 {
    DEFAULT_SOFTENING
}

fn default_trail() -> usize {
    DEFAULT_TRAIL_LENGTH
}

fn default_interval() -> u64 {
    1
}

fn default_scale() -> f64 {
    1.0
}

fn default_name() -> String {
    "Unnamed Body".to_string()
}

fn default_color() -> String {
    "blue".to_string()
}

fn default_radius() -> f64 {
    1.0
}
