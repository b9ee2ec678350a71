pub mod vector;
pub mod states;
pub mod params;
pub mod forces;
pub mod integrator;
pub mod engine;
pub mod scenario;
