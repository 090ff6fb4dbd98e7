//! Placement of prototype instances on a surface.
//!
//! A [`Prototype`] is an opaque capability handed in by the host: an
//! identifier plus the local-space triangles the engine needs for overlap
//! tests. The engine never touches a host scene; it returns [`Instance`]s that
//! name the prototype and carry a [`Pose`] for the host to materialize.
use std::sync::Arc;

use glam::{Affine3A, Mat4, Quat, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::Bvh;
use crate::error::{Error, Result};

pub mod events;
pub mod runner;
pub mod transform;

pub type PrototypeId = String;

/// Local-space triangle mesh of a prototype.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrototypeMesh {
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
}

impl PrototypeMesh {
    /// Creates a mesh, checking that every triangle index is in range.
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self> {
        let n = vertices.len();
        if let Some(t) = triangles.iter().find(|t| t.iter().any(|&i| i as usize >= n)) {
            return Err(Error::InvalidConfig(format!(
                "prototype triangle {t:?} references a vertex outside 0..{n}"
            )));
        }
        Ok(Self {
            vertices,
            triangles,
        })
    }

    /// Closed box centered on the origin, two triangles per face.
    pub fn cuboid(half_extents: Vec3) -> Self {
        let h = half_extents;
        let vertices = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        let triangles = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
            [3, 0, 4],
            [3, 4, 7],
        ];
        Self {
            vertices,
            triangles,
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Triangles transformed by `pose` into world space.
    pub fn world_triangles<'a>(&'a self, pose: &Pose) -> impl Iterator<Item = [Vec3; 3]> + 'a {
        let m = pose.matrix();
        self.triangles
            .iter()
            .map(move |t| t.map(|i| m.transform_point3(self.vertices[i as usize])))
    }
}

/// The object being scattered.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub id: PrototypeId,
    pub mesh: PrototypeMesh,
}

impl Prototype {
    pub fn new(id: impl Into<PrototypeId>, mesh: PrototypeMesh) -> Self {
        Self {
            id: id.into(),
            mesh,
        }
    }

    /// Box prototype centered on its origin.
    pub fn cuboid(id: impl Into<PrototypeId>, half_extents: Vec3) -> Self {
        Self::new(id, PrototypeMesh::cuboid(half_extents))
    }

    /// Cube with edge length 1 centered on its origin.
    pub fn unit_cube(id: impl Into<PrototypeId>) -> Self {
        Self::cuboid(id, Vec3::splat(0.5))
    }

    /// Builds the world-space bounds of this prototype placed at `pose`.
    pub fn world_bounds(&self, pose: &Pose) -> Bvh {
        Bvh::build(self.mesh.world_triangles(pose))
    }
}

/// Rigid placement of an instance.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn matrix(&self) -> Affine3A {
        Affine3A::from_rotation_translation(self.rotation, self.translation)
    }

    /// Column-major world matrix for hosts that do not use glam.
    pub fn to_mint(&self) -> mint::ColumnMatrix4<f32> {
        Mat4::from(self.matrix()).into()
    }
}

/// A committed copy of the prototype.
#[derive(Debug, Clone)]
pub struct Instance {
    /// Prototype this instance copies.
    pub prototype_id: PrototypeId,
    /// Surface vertex the instance was placed on.
    pub vertex: u32,
    /// World-space placement.
    pub pose: Pose,
    /// World-space bounds used for overlap tests.
    pub bounds: Arc<Bvh>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_has_closed_box_topology() {
        let mesh = PrototypeMesh::cuboid(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.vertices().len(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        // Every undirected edge of a closed triangle mesh is shared by two faces.
        let mut counts = std::collections::HashMap::new();
        for t in mesh.triangles() {
            for k in 0..3 {
                let (a, b) = (t[k], t[(k + 1) % 3]);
                *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        assert!(counts.values().all(|&c| c == 2));
    }

    #[test]
    fn mesh_rejects_out_of_range_indices() {
        let err = PrototypeMesh::new(vec![Vec3::ZERO; 3], vec![[0, 1, 3]]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn world_bounds_follow_the_pose() {
        let cube = Prototype::unit_cube("cube");
        let pose = Pose::new(Vec3::new(10.0, 0.0, 0.0), Quat::IDENTITY);
        let bounds = cube.world_bounds(&pose);
        let root = bounds.root_aabb().unwrap();
        assert_eq!(root.min, Vec3::new(9.5, -0.5, -0.5));
        assert_eq!(root.max, Vec3::new(10.5, 0.5, 0.5));
    }

    #[test]
    fn rotated_pose_rotates_triangles() {
        let slab = Prototype::cuboid("slab", Vec3::new(2.0, 0.5, 0.5));
        let pose = Pose::new(
            Vec3::ZERO,
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        );
        let root = *slab.world_bounds(&pose).root_aabb().unwrap();
        assert!((root.max.x - 0.5).abs() < 1e-5);
        assert!((root.max.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn mint_matrix_carries_translation() {
        let pose = Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);
        let m = pose.to_mint();
        assert_eq!(m.w.x, 1.0);
        assert_eq!(m.w.y, 2.0);
        assert_eq!(m.w.z, 3.0);
        assert_eq!(m.w.w, 1.0);
    }
}
