use std::ops::Range;
use super::quad::Quad;

#[derive(Clone, Debug)]
pub struct Node {
    /// Index of the first of four consecutive children, 0 for a leaf.
    pub children: usize,
    /// Node to continue with once this subtree is done, 0 at the end.
    pub next: usize,
    pub quad: Quad,
    /// Slice of `Quadtree::order` holding this node's particle indices.
    pub points: Range<usize>,
}

impl Node {
    pub fn new(next: usize, quad: Quad, points: Range<usize>) -> Self {
        Self {
            children: 0,
            next,
            quad,
            points,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children == 0
    }

    pub fn is_branch(&self) -> bool {
        self.children != 0
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
