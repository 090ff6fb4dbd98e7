//! Instance poses from surface candidates.
use glam::{Quat, Vec3};
use tracing::warn;

use crate::sampling::Candidate;
use crate::scatter::Pose;

/// Minimal rotation taking direction `from` onto direction `to`.
///
/// Inputs need not be normalized. A zero-length `to` yields the identity.
pub fn shortest_arc(from: Vec3, to: Vec3) -> Quat {
    let from = from.normalize_or_zero();
    let to = to.normalize_or_zero();
    if from == Vec3::ZERO || to == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(from, to)
}

/// Pose of an instance placed on `candidate`.
///
/// The translation is the surface origin plus the surface-local candidate
/// position; the rotation aligns the prototype's `up_axis` with the candidate
/// normal.
pub fn build_pose(surface_origin: Vec3, candidate: &Candidate, up_axis: Vec3) -> Pose {
    let normal = if candidate.normal.length_squared() > 0.0 {
        candidate.normal
    } else {
        warn!(
            "Vertex {} has a zero-length normal; keeping the up axis.",
            candidate.vertex
        );
        up_axis
    };
    Pose::new(
        surface_origin + candidate.position,
        shortest_arc(up_axis, normal),
    )
}
