/// Implemented RL algorithms
pub mod algo;

/// Data structures
pub mod ds;

/// Environment interfaces and the episodic card game
pub mod env;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// Episode trajectories
pub mod memory;

/// Testing environments
#[cfg(feature = "gym")]
pub mod gym;

/// Comparison harness for bandit exploration policies
#[cfg(feature = "gym")]
pub mod experiment;

mod util;
