//! Error taxonomy for the simulator
//!
//! Construction and configuration errors are returned to the caller as soon
//! as they are detected. `NumericalInstability` is raised at most once per
//! step, after the integrator has run, and the engine rolls the bodies back
//! to the last finite state before returning it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// Non-positive mass or non-finite initial state
    #[error("invalid body '{name}': {reason}")]
    InvalidBody { name: String, reason: String },

    /// Two bodies placed at exactly the same position
    #[error("bodies '{first}' and '{second}' occupy the same position")]
    DuplicateBody { first: String, second: String },

    /// Normalizing a vector with zero magnitude
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    /// Rejected engine or scenario setting
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A body's position or velocity stopped being finite
    #[error("numerical instability at step {step} (body '{body}') after {completed} completed steps")]
    NumericalInstability {
        completed: u64, // steps finished in the current run before the failure
        step: u64,      // engine step index that produced the bad state
        body: String,   // first offending body
    },

    /// Conservation analysis asked for before any snapshot was recorded
    #[error("no conservation baseline recorded yet, step the engine first")]
    NoBaseline,

    /// Scenario file could not be parsed
    #[error("scenario parse error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
