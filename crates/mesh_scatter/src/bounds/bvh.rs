//! Bounding volume hierarchy over a world-space triangle soup.
//!
//! The tree is built top-down: the primitives of a node are sorted by centroid
//! along the longest axis of the node bounds and split at the median, until a
//! node holds at most [`MAX_TRIANGLES_PER_LEAF`] triangles. Nodes live in one
//! flat array with the root at index 0.
//!
//! Two hierarchies are tested against each other by walking pairs of nodes and
//! only descending where node bounds overlap; surviving leaf pairs are
//! confirmed with an exact triangle test.
use std::cmp::Ordering;

use glam::Vec3;

use crate::bounds::triangle::triangles_intersect;
use crate::bounds::Aabb;

/// Maximum number of triangles stored in a leaf node.
pub const MAX_TRIANGLES_PER_LEAF: usize = 4;

#[derive(Debug, Clone)]
struct Primitive {
    aabb: Aabb,
    triangle: [Vec3; 3],
}

#[derive(Debug, Clone)]
enum BvhNode {
    Internal {
        aabb: Aabb,
        left: usize,
        right: usize,
    },
    Leaf {
        aabb: Aabb,
        first: usize,
        count: usize,
    },
}

impl BvhNode {
    fn aabb(&self) -> &Aabb {
        match self {
            Self::Internal { aabb, .. } | Self::Leaf { aabb, .. } => aabb,
        }
    }
}

/// Hierarchical bounds of one placed (or candidate) instance.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    primitives: Vec<Primitive>,
}

impl Bvh {
    /// Builds the hierarchy from world-space triangles.
    pub fn build(triangles: impl IntoIterator<Item = [Vec3; 3]>) -> Self {
        let mut primitives: Vec<Primitive> = triangles
            .into_iter()
            .map(|triangle| Primitive {
                aabb: Aabb::from_triangle(&triangle),
                triangle,
            })
            .collect();

        let mut bvh = Self {
            nodes: Vec::with_capacity(primitives.len() * 2),
            primitives: Vec::new(),
        };
        if !primitives.is_empty() {
            let len = primitives.len();
            bvh.build_recursive(&mut primitives, 0, len);
        }
        bvh.primitives = primitives;
        bvh
    }

    fn build_recursive(&mut self, primitives: &mut [Primitive], start: usize, end: usize) -> usize {
        let count = end - start;
        let aabb = primitives[start..end]
            .iter()
            .fold(Aabb::empty(), |mut acc, p| {
                acc.expand(&p.aabb);
                acc
            });

        if count <= MAX_TRIANGLES_PER_LEAF {
            let node_idx = self.nodes.len();
            self.nodes.push(BvhNode::Leaf {
                aabb,
                first: start,
                count,
            });
            return node_idx;
        }

        let axis = aabb.longest_axis();
        primitives[start..end].sort_by(|a, b| {
            let ca = a.aabb.center()[axis];
            let cb = b.aabb.center()[axis];
            ca.partial_cmp(&cb).unwrap_or(Ordering::Equal)
        });

        let mid = start + count / 2;
        let node_idx = self.nodes.len();
        self.nodes.push(BvhNode::Internal {
            aabb,
            left: 0,
            right: 0,
        });

        let left_idx = self.build_recursive(primitives, start, mid);
        let right_idx = self.build_recursive(primitives, mid, end);
        if let BvhNode::Internal { left, right, .. } = &mut self.nodes[node_idx] {
            *left = left_idx;
            *right = right_idx;
        }

        node_idx
    }

    /// Bounds of the whole hierarchy, `None` when empty.
    pub fn root_aabb(&self) -> Option<&Aabb> {
        self.nodes.first().map(BvhNode::aabb)
    }

    pub fn triangle_count(&self) -> usize {
        self.primitives.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// True if any triangle of `self` touches any triangle of `other`.
    pub fn intersects(&self, other: &Self) -> bool {
        if self.nodes.is_empty() || other.nodes.is_empty() {
            return false;
        }

        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
        while let Some((ia, ib)) = stack.pop() {
            let node_a = &self.nodes[ia];
            let node_b = &other.nodes[ib];
            if !node_a.aabb().overlaps(node_b.aabb()) {
                continue;
            }

            match (node_a, node_b) {
                (
                    BvhNode::Leaf {
                        first: first_a,
                        count: count_a,
                        ..
                    },
                    BvhNode::Leaf {
                        first: first_b,
                        count: count_b,
                        ..
                    },
                ) => {
                    for pa in &self.primitives[*first_a..first_a + count_a] {
                        for pb in &other.primitives[*first_b..first_b + count_b] {
                            if pa.aabb.overlaps(&pb.aabb)
                                && triangles_intersect(&pa.triangle, &pb.triangle)
                            {
                                return true;
                            }
                        }
                    }
                }
                (BvhNode::Internal { left, right, .. }, BvhNode::Leaf { .. }) => {
                    stack.push((*left, ib));
                    stack.push((*right, ib));
                }
                (BvhNode::Leaf { .. }, BvhNode::Internal { left, right, .. }) => {
                    stack.push((ia, *left));
                    stack.push((ia, *right));
                }
                (
                    BvhNode::Internal {
                        aabb: aabb_a,
                        left: left_a,
                        right: right_a,
                    },
                    BvhNode::Internal {
                        aabb: aabb_b,
                        left: left_b,
                        right: right_b,
                    },
                ) => {
                    // Split the larger node.
                    if aabb_a.volume() >= aabb_b.volume() {
                        stack.push((*left_a, ib));
                        stack.push((*right_a, ib));
                    } else {
                        stack.push((ia, *left_b));
                        stack.push((ia, *right_b));
                    }
                }
            }
        }

        false
    }
}
