use ultraviolet::DVec2;
use crate::particle::Particle;

/// Square region of the plane, stored as centre and side length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub center: DVec2,
    pub size: f64,
}

impl Quad {
    pub fn new_containing(particles: &[Particle]) -> Self {
        if particles.is_empty() {
            return Self { center: DVec2::zero(), size: 1.0 };
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for particle in particles {
            min_x = min_x.min(particle.position.x);
            min_y = min_y.min(particle.position.y);
            max_x = max_x.max(particle.position.x);
            max_y = max_y.max(particle.position.y);
        }

        let center = DVec2::new(min_x + max_x, min_y + max_y) * 0.5;
        let size = (max_x - min_x).max(max_y - min_y);

        Self { center, size }
    }

    pub fn into_quadrant(mut self, quadrant: usize) -> Self {
        self.size *= 0.5;
        self.center.x += ((quadrant & 1) as f64 - 0.5) * self.size;
        self.center.y += ((quadrant >> 1) as f64 - 0.5) * self.size;
        self
    }

    pub fn subdivide(&self) -> [Quad; 4] {
        [0, 1, 2, 3].map(|i| self.into_quadrant(i))
    }

    pub fn min(&self) -> DVec2 {
        self.center - DVec2::one() * (self.size * 0.5)
    }

    pub fn max(&self) -> DVec2 {
        self.center + DVec2::one() * (self.size * 0.5)
    }

    /// True when the closed region overlaps the closed box `[min, max]`.
    pub fn intersects(&self, min: DVec2, max: DVec2) -> bool {
        let lo = self.min();
        let hi = self.max();
        !(lo.x > max.x || hi.x < min.x || lo.y > max.y || hi.y < min.y)
    }
}
