use super::node::Node;
use super::quad::Quad;
use crate::config;
use crate::partition::Partition;
use crate::particle::Particle;
use crate::profile_scope;
use std::ops::Range;
use ultraviolet::DVec2;

/// Region tree over a snapshot of particle positions.
///
/// The tree never holds particles, only their indices, so it can be queried
/// while the caller mutates the particles it was built from. Region bounds
/// reflect the positions at build time.
#[derive(Clone, Debug)]
pub struct Quadtree {
    pub leaf_capacity: usize,
    pub nodes: Vec<Node>,
    /// Particle indices, permuted so every node owns a contiguous range.
    pub order: Vec<usize>,
    /// Largest radius seen at build time.
    pub max_radius: f64,
}

impl Quadtree {
    pub const ROOT: usize = 0;

    pub fn new(leaf_capacity: usize) -> Self {
        Self {
            leaf_capacity: leaf_capacity.max(1),
            nodes: Vec::new(),
            order: Vec::new(),
            max_radius: 0.0,
        }
    }

    /// Build a fresh tree for `particles`.
    pub fn from_particles(particles: &[Particle], leaf_capacity: usize) -> Self {
        let mut tree = Self::new(leaf_capacity);
        tree.build(particles);
        tree
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.order.clear();
        self.max_radius = 0.0;
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn subdivide(&mut self, node: usize, particles: &[Particle], range: Range<usize>) -> usize {
        let quad = self.nodes[node].quad;

        // Coincident points or a degenerate cell would split forever; keep them in one leaf.
        let first = particles[self.order[range.start]].position;
        let all_same_pos = self.order[range.clone()]
            .iter()
            .all(|&i| (particles[i].position - first).mag_sq() < 1e-12);
        if all_same_pos
            || !quad.size.is_finite()
            || quad.size < config::QUADTREE_MIN_SIZE
            || range.len() <= 1
        {
            return node;
        }

        let center = quad.center;
        let mut split = [range.start, 0, 0, 0, range.end];

        let predicate = |&i: &usize| particles[i].position.y < center.y;
        split[2] = split[0] + self.order[split[0]..split[4]].partition(predicate);

        let predicate = |&i: &usize| particles[i].position.x < center.x;
        split[1] = split[0] + self.order[split[0]..split[2]].partition(predicate);
        split[3] = split[2] + self.order[split[2]..split[4]].partition(predicate);

        let children = self.nodes.len();
        self.nodes[node].children = children;

        let nexts = [
            children + 1,
            children + 2,
            children + 3,
            self.nodes[node].next,
        ];
        let quads = quad.subdivide();
        for i in 0..4 {
            self.nodes.push(Node::new(nexts[i], quads[i], split[i]..split[i + 1]));
        }

        children
    }

    pub fn build(&mut self, particles: &[Particle]) {
        profile_scope!("quadtree_build");
        self.clear();
        if particles.is_empty() {
            return;
        }

        self.nodes.reserve(4 * particles.len() + 1);
        self.order.extend(0..particles.len());
        self.max_radius = particles.iter().fold(0.0, |m, p| p.radius.max(m));

        let quad = Quad::new_containing(particles);
        self.nodes.push(Node::new(0, quad, 0..particles.len()));

        let mut stack = vec![Self::ROOT];
        while let Some(node) = stack.pop() {
            let range = self.nodes[node].points.clone();
            if range.len() <= self.leaf_capacity {
                continue;
            }
            #[cfg(feature = "debug_quadtree")]
            println!("Quadtree::build: subdividing node {} ({} points)", node, range.len());
            let children = self.subdivide(node, particles, range);
            if children == node {
                continue;
            }
            for i in 0..4 {
                if !self.nodes[children + i].is_empty() {
                    stack.push(children + i);
                }
            }
        }

        #[cfg(feature = "debug_quadtree")]
        println!(
            "Quadtree::build: {} points, {} nodes, max radius {}",
            particles.len(),
            self.nodes.len(),
            self.max_radius
        );
    }

    /// Pre-order walk over the tree. `visitor` receives each node and the
    /// particle indices it owns when it is a leaf (empty for branches); it
    /// returns `true` to skip that node's children.
    pub fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(&Node, &[usize]) -> bool,
    {
        if self.nodes.is_empty() {
            return;
        }
        let mut node = Self::ROOT;
        loop {
            let n = &self.nodes[node];
            let points: &[usize] = if n.is_leaf() {
                &self.order[n.points.clone()]
            } else {
                &[]
            };
            let prune = visitor(n, points);

            if n.is_branch() && !prune {
                node = n.children;
                continue;
            }
            if n.next == 0 {
                break;
            }
            node = n.next;
        }
    }

    /// Call `f` with every particle index stored in a leaf whose region
    /// intersects the box `[min, max]`.
    pub fn for_each_in_box<F>(&self, min: DVec2, max: DVec2, mut f: F)
    where
        F: FnMut(usize),
    {
        self.visit(|node, points| {
            let outside = !node.quad.intersects(min, max);
            if !outside {
                for &i in points {
                    f(i);
                }
            }
            outside
        });
    }

    /// Index range of every leaf, in traversal order.
    pub fn leaves(&self) -> Vec<Range<usize>> {
        let mut leaves = Vec::new();
        self.visit(|node, _| {
            if node.is_leaf() {
                leaves.push(node.points.clone());
            }
            false
        });
        leaves
    }
}
