// simulation/mod.rs
// Re-exports and module declarations for simulation submodules

pub mod collision;
pub mod forces;
pub mod particle_set;
pub mod simulation;
pub use particle_set::ParticleSet;
pub use simulation::*;
