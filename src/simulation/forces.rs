//! Force model for the layout.
//!
//! Two displacement rules, both pure: gravity pulls a particle toward its
//! anchor, and the pair rule pushes two overlapping particles apart. Neither
//! touches velocity; the layout integrates positions directly.

use crate::particle::Particle;
use crate::profile_scope;
use rayon::prelude::*;
use ultraviolet::DVec2;

/// Displacement pulling `particle` toward its anchor, `strength` of the way.
pub fn gravity(particle: &Particle, strength: f64) -> DVec2 {
    (particle.anchor - particle.position) * strength
}

/// Apply gravity to every particle in place.
pub fn apply_gravity(particles: &mut [Particle], strength: f64) {
    profile_scope!("forces_gravity");
    particles.par_iter_mut().for_each(|particle| {
        let step = gravity(particle, strength);
        particle.position += step;
    });
}

/// Minimum centre distance two particles should keep. Particles in different
/// groups keep an extra `padding`.
pub fn required_separation(a: &Particle, b: &Particle, padding: f64) -> f64 {
    let extra = if a.group != b.group { padding } else { 0.0 };
    a.radius + b.radius + extra
}

/// Displacements `(Δa, Δb)` that push an overlapping pair apart.
///
/// Closes `strength` of the overlap along the line between the centres, split
/// evenly between both particles, so `Δa + Δb == 0`. This halves the classic
/// force-layout step, which moves each particle by the full `d * scale`: that
/// closes twice the overlap and overshoots the required distance whenever
/// `strength > 0.5`. Pairs that already keep
/// their distance, and exactly coincident pairs (no direction to push along),
/// get zero displacement.
pub fn resolve_pair(a: &Particle, b: &Particle, strength: f64, padding: f64) -> (DVec2, DVec2) {
    let d = a.position - b.position;
    let dist = d.mag();
    let required = required_separation(a, b, padding);

    if !(dist < required) || dist == 0.0 {
        return (DVec2::zero(), DVec2::zero());
    }

    let scale = (dist - required) / dist * strength;
    let half = d * (scale * 0.5);
    (-half, half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::GroupId;

    fn at(x: f64, y: f64, radius: f64, group: u32) -> Particle {
        Particle::new(DVec2::new(x, y), DVec2::zero(), radius, GroupId(group))
    }

    #[test]
    fn gravity_scales_offset_to_anchor() {
        let p = Particle::new(DVec2::new(10.0, -4.0), DVec2::new(2.0, 4.0), 1.0, GroupId(0));
        let step = gravity(&p, 0.25);
        assert_eq!(step, DVec2::new(-2.0, 2.0));
        assert_eq!(gravity(&p, 0.0), DVec2::zero());
    }

    #[test]
    fn gravity_pass_moves_every_particle() {
        let mut particles = vec![
            Particle::new(DVec2::new(4.0, 0.0), DVec2::zero(), 1.0, GroupId(0)),
            Particle::new(DVec2::new(0.0, -8.0), DVec2::zero(), 1.0, GroupId(1)),
        ];
        apply_gravity(&mut particles, 0.5);
        assert_eq!(particles[0].position, DVec2::new(2.0, 0.0));
        assert_eq!(particles[1].position, DVec2::new(0.0, -4.0));
    }

    #[test]
    fn pair_displacements_cancel() {
        let a = at(1.0, 2.0, 6.0, 0);
        let b = at(4.0, -1.5, 5.0, 1);
        let (da, db) = resolve_pair(&a, &b, 0.85, 3.0);
        assert!(da.mag() > 0.0);
        let sum = da + db;
        assert!(sum.mag() < 1e-12, "net displacement {:?}", sum);
    }

    #[test]
    fn separated_pair_is_untouched() {
        let a = at(0.0, 0.0, 10.0, 0);
        let b = at(20.0, 0.0, 10.0, 0);
        assert_eq!(resolve_pair(&a, &b, 0.85, 0.0), (DVec2::zero(), DVec2::zero()));
        let c = at(0.0, 30.0, 10.0, 0);
        assert_eq!(resolve_pair(&a, &c, 0.85, 0.0), (DVec2::zero(), DVec2::zero()));
    }

    #[test]
    fn coincident_pair_is_untouched() {
        let a = at(3.0, 3.0, 10.0, 0);
        let b = at(3.0, 3.0, 10.0, 1);
        assert_eq!(resolve_pair(&a, &b, 0.85, 5.0), (DVec2::zero(), DVec2::zero()));
    }

    #[test]
    fn padding_only_applies_across_groups() {
        let a = at(0.0, 0.0, 10.0, 0);
        let same = at(22.0, 0.0, 10.0, 0);
        let other = at(22.0, 0.0, 10.0, 1);
        assert_eq!(required_separation(&a, &same, 8.0), 20.0);
        assert_eq!(required_separation(&a, &other, 8.0), 28.0);
        assert_eq!(resolve_pair(&a, &same, 0.85, 8.0).0, DVec2::zero());
        assert!(resolve_pair(&a, &other, 0.85, 8.0).0.mag() > 0.0);
    }

    #[test]
    fn one_resolution_closes_strength_of_the_overlap() {
        let a = at(0.0, 0.0, 10.0, 0);
        let b = at(5.0, 0.0, 10.0, 0);
        let (da, db) = resolve_pair(&a, &b, 0.85, 0.0);
        assert!((da.x + 6.375).abs() < 1e-12);
        assert!((db.x - 6.375).abs() < 1e-12);
        let dist = ((a.position + da) - (b.position + db)).mag();
        assert!((dist - 17.75).abs() < 1e-12);
    }

    #[test]
    fn overlapping_pair_converges_to_contact_from_below() {
        let mut a = at(0.0, 0.0, 10.0, 0);
        let mut b = at(5.0, 0.0, 10.0, 0);
        let mut last = 5.0;
        for call in 0..40 {
            let (da, db) = resolve_pair(&a, &b, 0.85, 0.0);
            a.position += da;
            b.position += db;
            let dist = (a.position - b.position).mag();
            assert!(dist <= 20.0 + 1e-9, "call {} overshot: {}", call, dist);
            assert!(dist >= last, "call {} moved closer: {} < {}", call, dist, last);
            assert_eq!(a.position.y, 0.0);
            assert_eq!(b.position.y, 0.0);
            last = dist;
        }
        assert!(last > 20.0 - 1e-6, "did not converge: {}", last);
        assert!(a.position.x < 0.0 && b.position.x > 5.0);
    }
}
