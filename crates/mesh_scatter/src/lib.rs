#![forbid(unsafe_code)]
//! mesh_scatter: collision-free scattering of prototype instances across mesh surfaces.
//!
//! Modules:
//! - surface: immutable mesh view, baked scalar field, vertex adjacency and connectivity walk
//! - sampling: candidate sources (weighted point cloud, connectivity-ordered sequence)
//! - bounds: world-space bounding volume hierarchies and the overlap index
//! - scatter: prototypes, poses, the placement runner and its events
//!
//! Entry points are [`scatter::runner::place_random`] and
//! [`scatter::runner::place_clustered`], or [`scatter::runner::ScatterRunner`] for
//! event streaming and run statistics.
pub mod bounds;
pub mod error;
pub mod sampling;
pub mod scatter;
pub mod surface;

/// Convenient re-exports for common types. Import with `use mesh_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::bounds::{overlaps, Aabb, BoundsIndex, Bvh};
    pub use crate::error::{Error, Result};
    pub use crate::sampling::{
        Candidate, CandidateSource, ConnectivitySequence, Draw, WeightedPointCloud,
    };
    pub use crate::scatter::events::{
        AsEventSink, EventSink, FnSink, MultiSink, PlacementEvent, PlacementEventKind, VecSink,
    };
    pub use crate::scatter::runner::{
        place_clustered, place_random, RunResult, ScatterConfig, ScatterMode, ScatterRunner,
    };
    pub use crate::scatter::transform::{build_pose, shortest_arc};
    pub use crate::scatter::{Instance, Pose, Prototype, PrototypeId, PrototypeMesh};
    pub use crate::surface::field::ScalarField;
    pub use crate::surface::graph::AdjacencyGraph;
    pub use crate::surface::{Polygon, Surface, SurfaceBuilder, Vertex};
}
