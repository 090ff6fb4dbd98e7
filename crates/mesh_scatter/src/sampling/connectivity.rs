//! Connectivity-ordered candidates for clustered placement.
use std::collections::VecDeque;

use glam::Vec3;
use rand::Rng;

use crate::sampling::{Candidate, CandidateSource, Draw};
use crate::surface::field::ScalarField;
use crate::surface::graph::AdjacencyGraph;
use crate::surface::Surface;

/// Vertices in the order a connectivity walk from a seed vertex reaches them.
///
/// Weights are carried for reporting only; this source never skips and never
/// consumes randomness.
#[derive(Debug, Clone, Default)]
pub struct ConnectivitySequence {
    queue: VecDeque<Candidate>,
}

impl ConnectivitySequence {
    /// Walks the surface graph from `seed`.
    ///
    /// With a field, the graph is first reduced to qualifying vertices under
    /// `cutoff` (see [`AdjacencyGraph::retain_qualifying`]).
    pub fn from_surface(
        surface: &Surface,
        field: Option<&ScalarField>,
        cutoff: f32,
        seed: u32,
        align_to_normal: bool,
        up_axis: Vec3,
    ) -> Self {
        let mut graph = AdjacencyGraph::from_surface(surface);
        if let Some(field) = field {
            graph.retain_qualifying(field, cutoff);
        }

        let queue = graph
            .connect(seed)
            .into_iter()
            .filter_map(|vertex| {
                let v = surface.vertex(vertex)?;
                Some(Candidate {
                    vertex,
                    position: v.position,
                    normal: if align_to_normal { v.normal } else { up_axis },
                    weight: field.map_or(1.0, |f| f.value(vertex)),
                })
            })
            .collect();
        Self { queue }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Vertex indices still to be handed out, in order.
    pub fn vertices(&self) -> impl Iterator<Item = u32> + '_ {
        self.queue.iter().map(|c| c.vertex)
    }
}

impl CandidateSource for ConnectivitySequence {
    fn remaining(&self) -> usize {
        self.queue.len()
    }

    fn draw(&mut self, _rng: &mut dyn Rng) -> Draw {
        match self.queue.pop_front() {
            Some(candidate) => Draw::Ready(candidate),
            None => Draw::Exhausted,
        }
    }
}
