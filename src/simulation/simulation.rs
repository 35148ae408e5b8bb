// simulation/simulation.rs
// Contains the Simulation struct (the per-set handle) and its tick/lifecycle methods

use super::collision;
use super::forces;
use super::particle_set::ParticleSet;
use crate::config::{self, LayoutConfig};
use crate::error::Result;
use crate::particle::{Particle, ParticleSpec};
use crate::profile_scope;
use crate::quadtree::Quadtree;
use rayon::prelude::*;
use ultraviolet::DVec2;

/// Decay clock of one set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationState {
    pub alpha: f64,
    pub running: bool,
}

impl SimulationState {
    pub const IDLE: Self = Self {
        alpha: 0.0,
        running: false,
    };

    pub fn is_idle(&self) -> bool {
        !self.running
    }
}

/// What a call to `tick` did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// The set was already idle; nothing changed.
    Idle,
    /// Alpha dropped below the threshold on this tick; the set is now idle.
    Settled,
    /// Forces were applied with the given alpha.
    Advanced { alpha: f64 },
}

/// Read-only view handed to tick subscribers.
#[derive(Clone, Debug, PartialEq)]
pub struct TickSnapshot {
    pub tick: u64,
    pub alpha: f64,
    pub positions: Vec<DVec2>,
}

pub type TickCallback = Box<dyn FnMut(&TickSnapshot) + Send>;

/// The main layout state for one particle set. This is the handle every
/// operation goes through; independent sets never share state.
pub struct Simulation {
    pub particles: ParticleSet,
    pub state: SimulationState,
    pub config: LayoutConfig,
    pub quadtree: Quadtree,
    /// Ticks that applied forces since creation.
    pub frame: u64,
    subscribers: Vec<TickCallback>,
    rng: fastrand::Rng,
}

impl Simulation {
    pub fn new(config: LayoutConfig, particles: Vec<Particle>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            particles: ParticleSet::new(particles),
            state: SimulationState::IDLE,
            quadtree: Quadtree::new(config.leaf_capacity),
            frame: 0,
            subscribers: Vec::new(),
            rng: fastrand::Rng::with_seed(config.spawn_seed),
            config,
        })
    }

    /// A set using the default configuration.
    pub fn with_particles(particles: Vec<Particle>) -> Self {
        Self {
            particles: ParticleSet::new(particles),
            state: SimulationState::IDLE,
            quadtree: Quadtree::new(config::QUADTREE_LEAF_CAPACITY),
            frame: 0,
            subscribers: Vec::new(),
            rng: fastrand::Rng::with_seed(config::DEFAULT_SPAWN_SEED),
            config: LayoutConfig::default(),
        }
    }

    pub fn alpha(&self) -> f64 {
        self.state.alpha
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.as_slice()
    }

    /// (Re)start the decay clock.
    pub fn start(&mut self) {
        self.state.alpha = self.config.alpha_start;
        self.state.running = true;
    }

    /// Stop ticking without touching positions.
    pub fn stop(&mut self) {
        self.state = SimulationState::IDLE;
    }

    /// Register a callback invoked after every tick that applied forces.
    pub fn on_tick<F>(&mut self, callback: F)
    where
        F: FnMut(&TickSnapshot) + Send + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot {
            tick: self.frame,
            alpha: self.state.alpha,
            positions: self.particles.positions(),
        }
    }

    /// Advance one tick: cool, pull every particle toward its anchor, then
    /// resolve collisions.
    pub fn tick(&mut self) -> TickOutcome {
        profile_scope!("simulation_tick");
        if !self.state.running {
            return TickOutcome::Idle;
        }

        self.state.alpha *= self.config.cooling_factor;
        if self.state.alpha < self.config.alpha_min {
            self.stop();
            return TickOutcome::Settled;
        }

        let alpha = self.state.alpha;
        forces::apply_gravity(self.particles.as_mut_slice(), self.config.gravity_scale * alpha);
        collision::collide(self);

        self.frame += 1;
        self.notify();
        TickOutcome::Advanced { alpha }
    }

    /// Tick until the set goes idle or `max_ticks` ticks have run. Returns the
    /// number of ticks that applied forces.
    pub fn run_until_idle(&mut self, max_ticks: usize) -> usize {
        let mut advanced = 0;
        for _ in 0..max_ticks {
            match self.tick() {
                TickOutcome::Advanced { .. } => advanced += 1,
                TickOutcome::Settled | TickOutcome::Idle => break,
            }
        }
        advanced
    }

    fn notify(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for callback in &mut self.subscribers {
            callback(&snapshot);
        }
    }

    /// Where a newly added particle appears before jitter.
    fn spawn_origin(&self, spec: &ParticleSpec) -> DVec2 {
        self.config
            .spawn_point()
            .or_else(|| self.particles.centroid())
            .unwrap_or(spec.anchor)
    }

    /// Append a particle at the spawn point and restart the decay clock.
    /// Returns the new particle's index.
    pub fn add(&mut self, spec: ParticleSpec) -> usize {
        let jitter = self.config.spawn_jitter;
        let offset = DVec2::new(
            (self.rng.f64() * 2.0 - 1.0) * jitter,
            (self.rng.f64() * 2.0 - 1.0) * jitter,
        );
        let position = self.spawn_origin(&spec) + offset;
        let index = self.particles.push(Particle::from_spec(spec, position));
        self.start();
        index
    }

    /// Remove the particle at `index` and restart the decay clock. On an
    /// out-of-range index nothing changes and the clock is left alone.
    pub fn remove(&mut self, index: usize) -> Result<Particle> {
        let removed = self.particles.remove(index)?;
        self.start();
        Ok(removed)
    }

    /// Remove every particle and restart the decay clock.
    pub fn clear(&mut self) -> usize {
        let n = self.particles.clear();
        self.start();
        n
    }

    /// Largest amount by which any pair falls short of its required
    /// separation, 0 when nothing overlaps.
    pub fn max_overlap(&self) -> f64 {
        profile_scope!("max_overlap");
        let particles = self.particles.as_slice();
        let tree = Quadtree::from_particles(particles, self.config.leaf_capacity);
        let reach = tree.max_radius + self.config.padding;
        let mut worst = 0.0_f64;
        for (i, a) in particles.iter().enumerate() {
            let r = a.radius + reach;
            let min = a.position - DVec2::one() * r;
            let max = a.position + DVec2::one() * r;
            tree.for_each_in_box(min, max, |j| {
                if j <= i {
                    return;
                }
                let b = &particles[j];
                let required = forces::required_separation(a, b, self.config.padding);
                let dist = (a.position - b.position).mag();
                worst = worst.max(required - dist);
            });
        }
        worst
    }
}

/// Tick several independent sets in parallel.
pub fn tick_all(simulations: &mut [Simulation]) -> Vec<TickOutcome> {
    profile_scope!("tick_all");
    simulations.par_iter_mut().map(|sim| sim.tick()).collect()
}
