//! Vertex adjacency graph and the connectivity walk used by clustered placement.
//!
//! The walk grows outward from a seed vertex and never recurses, so its stack
//! usage stays flat no matter how large the mesh is. The graph is consumed by
//! [`AdjacencyGraph::connect`]: every expanded vertex has its adjacency cleared
//! so it cannot be entered twice.
use tracing::{debug, warn};

use crate::surface::field::ScalarField;
use crate::surface::Surface;

/// Undirected vertex graph built from surface edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyGraph {
    neighbors: Vec<Vec<u32>>,
}

impl AdjacencyGraph {
    /// Builds the graph from the surface's edge list.
    pub fn from_surface(surface: &Surface) -> Self {
        Self::from_edges(surface.vertex_count(), surface.edges())
    }

    /// Builds a graph over `vertex_count` vertices from undirected edges.
    /// Edges referencing vertices outside the range are ignored.
    pub fn from_edges(vertex_count: usize, edges: &[[u32; 2]]) -> Self {
        let mut neighbors = vec![Vec::new(); vertex_count];
        for &[a, b] in edges {
            if a == b || a as usize >= vertex_count || b as usize >= vertex_count {
                continue;
            }
            neighbors[a as usize].push(b);
            neighbors[b as usize].push(a);
        }
        Self { neighbors }
    }

    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Neighbors of `vertex` still present in the graph.
    pub fn neighbors(&self, vertex: u32) -> &[u32] {
        self.neighbors
            .get(vertex as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True when `vertex` has no remaining edges.
    pub fn is_empty_at(&self, vertex: u32) -> bool {
        self.neighbors(vertex).is_empty()
    }

    /// Drops every vertex that is not qualifying under `cutoff`.
    ///
    /// A vertex qualifies when its own value and the values of all of its
    /// neighbors meet the cutoff. Dropped vertices lose their edges in both
    /// directions, which leaves only the interior of the high-value regions.
    pub fn retain_qualifying(&mut self, field: &ScalarField, cutoff: f32) {
        let qualifying: Vec<bool> = self
            .neighbors
            .iter()
            .enumerate()
            .map(|(v, adj)| {
                field.meets_cutoff(v as u32, cutoff)
                    && adj.iter().all(|&n| field.meets_cutoff(n, cutoff))
            })
            .collect();

        for (v, adj) in self.neighbors.iter_mut().enumerate() {
            if qualifying[v] {
                adj.retain(|&n| qualifying[n as usize]);
            } else {
                adj.clear();
            }
        }

        debug!(
            "Field cutoff {} keeps {} of {} vertices.",
            cutoff,
            qualifying.iter().filter(|&&q| q).count(),
            qualifying.len()
        );
    }

    /// Flattens the graph into a single visiting order starting at `start`.
    ///
    /// If `start` has no remaining edges, the walk starts at the first vertex
    /// (in index order) that has any. Each connected component is expanded
    /// breadth-first; once it is exhausted the walk jumps to the next vertex in
    /// index order that still has edges. Vertices without edges never appear.
    pub fn connect(mut self, start: u32) -> Vec<u32> {
        let vertex_count = self.neighbors.len();
        let mut order: Vec<u32> = Vec::new();
        let mut queued = vec![false; vertex_count];

        let first = if !self.is_empty_at(start) {
            Some(start)
        } else {
            if (start as usize) < vertex_count {
                warn!("Seed vertex {start} has no qualifying edges; starting elsewhere.");
            } else {
                warn!("Seed vertex {start} is out of range 0..{vertex_count}; starting elsewhere.");
            }
            self.next_non_empty(0)
        };

        let Some(first) = first else {
            return order;
        };

        order.push(first);
        queued[first as usize] = true;

        // Everything in `order[frontier..]` has been queued but not expanded.
        let mut frontier = 0;
        // Every index below `scan` is known to have no remaining edges.
        let mut scan = 0;
        loop {
            while frontier < order.len() {
                let v = order[frontier] as usize;
                frontier += 1;
                for n in std::mem::take(&mut self.neighbors[v]) {
                    if !queued[n as usize] {
                        queued[n as usize] = true;
                        order.push(n);
                    }
                }
            }

            match self.next_non_empty(scan) {
                Some(next) => {
                    scan = next as usize;
                    queued[scan] = true;
                    order.push(next);
                }
                None => break,
            }
        }

        order
    }

    fn next_non_empty(&self, from: usize) -> Option<u32> {
        self.neighbors
            .iter()
            .skip(from)
            .position(|adj| !adj.is_empty())
            .map(|offset| (from + offset) as u32)
    }
}
