pub mod error;
pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use error::{Result, SimError};

pub use simulation::vector::{NVec3, VectorExt};
pub use simulation::states::{Body, BodySnapshot, System, Trail};
pub use simulation::params::Parameters;
pub use simulation::forces::{Acceleration, NewtonianGravity};
pub use simulation::integrator::{euler_step, rk4_step, verlet_step, Integrator};
pub use simulation::engine::{ConservationAnalysis, ConservationSnapshot, Drift, Engine};
pub use simulation::scenario::{build_scenario, Preset, SolarSystem};

pub use configuration::config::{BodyConfig, EngineConfig, ParametersConfig, ScenarioConfig, SystemConfig};

pub use benchmark::benchmark::{bench_integrators, BenchResult};
