// simulation/particle_set.rs
// Ordered particle storage with positional identity

use crate::error::{LayoutError, Result};
use crate::particle::Particle;
use ultraviolet::DVec2;

/// Ordered collection of particles simulated together. A particle's identity
/// is its index; removing one shifts every later index down by one.
#[derive(Clone, Debug, Default)]
pub struct ParticleSet {
    particles: Vec<Particle>,
}

impl ParticleSet {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Append and return the new particle's index.
    pub fn push(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        self.particles.len() - 1
    }

    /// Remove the particle at `index`. An out-of-range index leaves the set
    /// untouched.
    pub fn remove(&mut self, index: usize) -> Result<Particle> {
        if index >= self.particles.len() {
            return Err(LayoutError::InvalidIndex {
                index,
                len: self.particles.len(),
            });
        }
        Ok(self.particles.remove(index))
    }

    /// Remove everything, returning how many particles were dropped.
    pub fn clear(&mut self) -> usize {
        let n = self.particles.len();
        self.particles.clear();
        n
    }

    /// Mean of current positions, `None` for an empty set.
    pub fn centroid(&self) -> Option<DVec2> {
        if self.particles.is_empty() {
            return None;
        }
        let sum = self
            .particles
            .iter()
            .fold(DVec2::zero(), |acc, p| acc + p.position);
        Some(sum / self.particles.len() as f64)
    }

    pub fn positions(&self) -> Vec<DVec2> {
        self.particles.iter().map(|p| p.position).collect()
    }
}

impl<'a> IntoIterator for &'a ParticleSet {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}
