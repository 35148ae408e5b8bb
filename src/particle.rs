// Defines the particle struct (position, anchor, radius, group, label). Position is the only
// field the simulation mutates; the anchor is the cluster focus gravity pulls toward.

use ultraviolet::DVec2;

/// Opaque discriminator for collision padding. Particles in different groups
/// keep an extra `padding` apart.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct GroupId(pub u32);

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub anchor: DVec2,
    pub radius: f64,
    pub group: GroupId,
    /// Caller-defined identifier carried through add and remove. The layout
    /// never reads it.
    pub label: Option<usize>,
}

/// What a caller supplies when adding a particle at runtime. The set decides
/// the starting position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSpec {
    pub anchor: DVec2,
    pub radius: f64,
    pub group: GroupId,
    pub label: Option<usize>,
}

impl Particle {
    pub fn new(position: DVec2, anchor: DVec2, radius: f64, group: GroupId) -> Self {
        Self {
            position,
            anchor,
            radius,
            group,
            label: None,
        }
    }

    pub fn with_label(mut self, label: usize) -> Self {
        self.label = Some(label);
        self
    }

    /// A particle resting on its anchor.
    pub fn at_anchor(anchor: DVec2, radius: f64, group: GroupId) -> Self {
        Self::new(anchor, anchor, radius, group)
    }

    pub fn from_spec(spec: ParticleSpec, position: DVec2) -> Self {
        Self {
            label: spec.label,
            ..Self::new(position, spec.anchor, spec.radius, spec.group)
        }
    }

    pub fn spec(&self) -> ParticleSpec {
        ParticleSpec {
            anchor: self.anchor,
            radius: self.radius,
            group: self.group,
            label: self.label,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.x.is_finite() && self.position.y.is_finite()
    }
}

impl ParticleSpec {
    pub fn new(anchor: DVec2, radius: f64, group: GroupId) -> Self {
        Self {
            anchor,
            radius,
            group,
            label: None,
        }
    }

    pub fn with_label(mut self, label: usize) -> Self {
        self.label = Some(label);
        self
    }
}
