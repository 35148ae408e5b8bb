// Centralized configuration for layout parameters

use serde::{Deserialize, Serialize};
use ultraviolet::DVec2;

use crate::error::{LayoutError, Result};

// ====================
// Cooling Schedule
// ====================
/// Alpha assigned by `start()`.
pub const DEFAULT_ALPHA_START: f64 = 1.0;
/// Multiplier applied to alpha at the beginning of every tick.
pub const DEFAULT_COOLING_FACTOR: f64 = 0.99;
/// Below this alpha the set is considered settled and ticking stops.
pub const DEFAULT_ALPHA_MIN: f64 = 0.005;

// ====================
// Force Parameters
// ====================
/// Gravity strength per tick is `GRAVITY_SCALE * alpha`.
pub const DEFAULT_GRAVITY_SCALE: f64 = 0.5;
/// Collision strength does not decay with alpha.
pub const DEFAULT_COLLISION_STRENGTH: f64 = 0.85;

// ====================
// Quadtree Parameters
// ====================
pub const QUADTREE_LEAF_CAPACITY: usize = 1; // Max particles per quadtree leaf
pub const QUADTREE_MIN_SIZE: f64 = 1e-6; // Cells smaller than this are never split

// ====================
// Spawning
// ====================
/// Half-width of the square jitter added around the spawn point.
pub const DEFAULT_SPAWN_JITTER: f64 = 1.0;
pub const DEFAULT_SPAWN_SEED: u64 = 0x5eed;

// ====================
// Driver
// ====================
/// Interval between ticks issued by the threaded driver (~60 Hz).
pub const DEFAULT_FRAME_MS: u64 = 16;
/// Upper bound on ticks used by `run_until_idle` callers that have no opinion.
pub const MAX_SETTLE_TICKS: usize = 10_000;

/// Per-set layout parameters. Every field falls back to its default when it is
/// missing from a config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub alpha_start: f64,
    pub cooling_factor: f64,
    pub alpha_min: f64,
    pub gravity_scale: f64,
    pub collision_strength: f64,
    /// Extra separation between particles of different groups.
    pub padding: f64,
    /// Where newly added particles appear. `None` means the centroid of the
    /// current positions, or the new particle's own anchor for an empty set.
    pub spawn_point: Option<[f64; 2]>,
    pub spawn_jitter: f64,
    pub spawn_seed: u64,
    pub leaf_capacity: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            alpha_start: DEFAULT_ALPHA_START,
            cooling_factor: DEFAULT_COOLING_FACTOR,
            alpha_min: DEFAULT_ALPHA_MIN,
            gravity_scale: DEFAULT_GRAVITY_SCALE,
            collision_strength: DEFAULT_COLLISION_STRENGTH,
            padding: 0.0,
            spawn_point: None,
            spawn_jitter: DEFAULT_SPAWN_JITTER,
            spawn_seed: DEFAULT_SPAWN_SEED,
            leaf_capacity: QUADTREE_LEAF_CAPACITY,
        }
    }
}

impl LayoutConfig {
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_spawn_point(mut self, point: DVec2) -> Self {
        self.spawn_point = Some([point.x, point.y]);
        self
    }

    pub fn spawn_point(&self) -> Option<DVec2> {
        self.spawn_point.map(|[x, y]| DVec2::new(x, y))
    }

    /// Reject parameter combinations that would stall or blow up the loop.
    pub fn validate(&self) -> Result<()> {
        if !(self.cooling_factor > 0.0 && self.cooling_factor < 1.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "cooling_factor must be in (0, 1), got {}",
                self.cooling_factor
            )));
        }
        if !(self.alpha_start > 0.0 && self.alpha_start <= 1.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "alpha_start must be in (0, 1], got {}",
                self.alpha_start
            )));
        }
        if !(self.alpha_min > 0.0 && self.alpha_min < self.alpha_start) {
            return Err(LayoutError::InvalidConfig(format!(
                "alpha_min must be in (0, alpha_start), got {}",
                self.alpha_min
            )));
        }
        if self.gravity_scale < 0.0 || self.collision_strength < 0.0 {
            return Err(LayoutError::InvalidConfig(
                "force strengths must be non-negative".to_string(),
            ));
        }
        if self.padding < 0.0 || self.spawn_jitter < 0.0 {
            return Err(LayoutError::InvalidConfig(
                "padding and spawn_jitter must be non-negative".to_string(),
            ));
        }
        if self.leaf_capacity == 0 {
            return Err(LayoutError::InvalidConfig(
                "leaf_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
