// simulation/collision.rs
// Collision pass: quadtree-pruned pair search plus in-place pair resolution

use super::forces;
use crate::particle::Particle;
use crate::profile_scope;
use crate::quadtree::Quadtree;
use crate::simulation::Simulation;
use ultraviolet::DVec2;

pub fn collide(sim: &mut Simulation) {
    profile_scope!("collision");
    let strength = sim.config.collision_strength;
    let padding = sim.config.padding;
    resolve_all(sim.particles.as_mut_slice(), &mut sim.quadtree, strength, padding);
}

/// Rebuild `tree` from the current positions, then push every overlapping
/// pair apart, visiting particles in insertion order.
///
/// Positions are read live during the pass, so a particle moved earlier in
/// the pass is seen at its new position; the tree's regions stay as built.
pub fn resolve_all(particles: &mut [Particle], tree: &mut Quadtree, strength: f64, padding: f64) {
    tree.build(particles);
    let reach = tree.max_radius + padding;

    for i in 0..particles.len() {
        let pos = particles[i].position;
        let r = particles[i].radius + reach;
        let min = pos - DVec2::one() * r;
        let max = pos + DVec2::one() * r;

        tree.for_each_in_box(min, max, |j| {
            if j != i {
                resolve(particles, i, j, strength, padding);
            }
        });
    }
}

fn resolve(particles: &mut [Particle], i: usize, j: usize, strength: f64, padding: f64) {
    let (di, dj) = forces::resolve_pair(&particles[i], &particles[j], strength, padding);
    particles[i].position += di;
    particles[j].position += dj;
}
