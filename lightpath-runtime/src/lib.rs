//! lightpath Runtime
//!
//! Everything around the propagation engine:
//! - JSON topology loading
//! - TOML run configuration
//! - Simulation runner and analysis reports
//! - CSV/JSON export and plain-text topology rendering

pub mod config;
pub mod export;
pub mod loader;
pub mod render;
pub mod simulation;

pub use config::*;
pub use export::*;
pub use loader::*;
pub use render::*;
pub use simulation::*;
