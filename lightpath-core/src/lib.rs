//! lightpath Core - Topology model and signal propagation engine
//!
//! This crate provides the foundational primitives:
//! - Probe signals that accumulate noise and latency along a path
//! - Nodes and directed physical links with their physical-effect formulas
//! - The topology: construction, connection, simple-path enumeration
//! - All-pairs path analysis producing per-path SNR records
//!
//! The core performs no file or format handling; it consumes
//! [`NodeDescriptor`]s and produces [`PathRecord`]s.

pub mod analysis;
pub mod descriptor;
pub mod error;
pub mod link;
pub mod node;
pub mod paths;
pub mod signal;
pub mod topology;

#[cfg(test)]
mod testing;

pub use analysis::*;
pub use descriptor::*;
pub use error::*;
pub use link::*;
pub use node::*;
pub use signal::*;
pub use topology::*;

/// Speed of light in vacuum (m/s)
pub const SPEED_OF_LIGHT: f64 = 3e8;

/// Fraction of `SPEED_OF_LIGHT` at which light travels in fiber
pub const FIBER_VELOCITY_FACTOR: f64 = 2.0 / 3.0;

/// Amplified-spontaneous-emission noise coefficient (1/m)
pub const ASE_NOISE_COEFFICIENT: f64 = 1e-9;

/// Reference probe power used by path analysis (W)
pub const REFERENCE_POWER: f64 = 1e-3;

/// Default cap on the number of records a single analysis may produce
pub const DEFAULT_MAX_PATHS: usize = 100_000;
