/// Learning algorithms
pub mod algo;

/// The episode-level interface between controllers and environments
pub mod agent;

/// Footman to enemy target assignments
pub mod assignment;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Crate error type
pub mod error;

/// Significant-event detection between decision steps
pub mod event;

/// Exploration policies
pub mod exploration;

/// State-action features
pub mod features;

/// Grid distances and adjacency
pub mod geometry;

/// Weight persistence
pub mod persist;

/// Learning progress reporting
pub mod report;

/// Per-footman rewards
pub mod reward;

/// Per-step battlefield snapshots
pub mod snapshot;

/// Testing environments
#[cfg(feature = "gym")]
pub mod gym;

mod util;

pub use error::{Error, Result};
