pub mod app;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod init_config;
pub mod particle;
pub mod partition;
pub mod profiler;
pub mod quadtree;
pub mod simulation;

pub use config::LayoutConfig;
pub use error::{LayoutError, Result};
pub use particle::{GroupId, Particle, ParticleSpec};
pub use simulation::{tick_all, Simulation, TickOutcome, TickSnapshot};

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));

/// Build an idle particle set from `particles`. Call `start` on the result to
/// begin settling.
pub fn create_particle_set(config: LayoutConfig, particles: Vec<Particle>) -> Result<Simulation> {
    Simulation::new(config, particles)
}
