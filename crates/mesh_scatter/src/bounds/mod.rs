//! Bounding volumes and the overlap index of committed instances.
//!
//! Each instance is represented by a [`Bvh`] over its world-space triangles.
//! [`BoundsIndex`] is the append-only collision context of one placement run:
//! candidates are tested against every committed entry and committed entries
//! are never removed.
use std::sync::Arc;

use glam::Vec3;

pub mod bvh;
pub mod triangle;

pub use bvh::Bvh;

/// Axis-aligned bounding box. Boxes that merely touch are considered overlapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// Inverted box that any expansion replaces.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_triangle(tri: &[Vec3; 3]) -> Self {
        Self {
            min: tri[0].min(tri[1]).min(tri[2]),
            max: tri[0].max(tri[1]).max(tri[2]),
        }
    }

    pub fn expand(&mut self, other: &Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn expand_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Index of the longest axis (0 = X, 1 = Y, 2 = Z).
    pub fn longest_axis(&self) -> usize {
        let d = self.max - self.min;
        if d.x >= d.y && d.x >= d.z {
            0
        } else if d.y >= d.z {
            1
        } else {
            2
        }
    }

    pub fn volume(&self) -> f32 {
        let d = (self.max - self.min).max(Vec3::ZERO);
        d.x * d.y * d.z
    }

    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }
}

/// Returns true if `candidate` intersects any of the `existing` hierarchies.
pub fn overlaps<'a>(candidate: &Bvh, existing: impl IntoIterator<Item = &'a Bvh>) -> bool {
    let Some(root) = candidate.root_aabb() else {
        return false;
    };
    existing.into_iter().any(|other| {
        other
            .root_aabb()
            .is_some_and(|other_root| root.overlaps(other_root))
            && candidate.intersects(other)
    })
}

/// Append-only set of committed instance bounds.
#[derive(Debug, Clone, Default)]
pub struct BoundsIndex {
    entries: Vec<Arc<Bvh>>,
}

impl BoundsIndex {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n),
        }
    }

    /// True if `candidate` intersects any committed entry.
    pub fn overlaps(&self, candidate: &Bvh) -> bool {
        overlaps(candidate, self.entries.iter().map(Arc::as_ref))
    }

    /// Commits bounds; they stay in the index for the rest of the run.
    pub fn commit(&mut self, bounds: Arc<Bvh>) {
        self.entries.push(bounds);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bvh> {
        self.entries.iter().map(Arc::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, size: f32) -> Bvh {
        let p0 = Vec3::new(x, y, 0.0);
        let p1 = Vec3::new(x + size, y, 0.0);
        let p2 = Vec3::new(x + size, y + size, 0.0);
        let p3 = Vec3::new(x, y + size, 0.0);
        Bvh::build([[p0, p1, p2], [p0, p2, p3]])
    }

    #[test]
    fn aabb_overlap_is_inclusive() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let touching = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let apart = Aabb::new(Vec3::new(1.01, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.overlaps(&touching));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn aabb_expand_and_axis() {
        let mut b = Aabb::empty();
        assert!(!b.is_valid());
        b.expand_point(Vec3::new(0.0, -1.0, 0.0));
        b.expand_point(Vec3::new(1.0, 3.0, 0.5));
        assert!(b.is_valid());
        assert_eq!(b.longest_axis(), 1);
        assert_eq!(b.center(), Vec3::new(0.5, 1.0, 0.25));
        assert!((b.volume() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn index_accumulates_and_detects_overlap() {
        let mut index = BoundsIndex::new();
        let first = square(0.0, 0.0, 1.0);
        assert!(!index.overlaps(&first));
        index.commit(Arc::new(first));

        assert!(index.overlaps(&square(0.5, 0.5, 1.0)));
        assert!(!index.overlaps(&square(3.0, 0.0, 1.0)));

        index.commit(Arc::new(square(3.0, 0.0, 1.0)));
        assert_eq!(index.len(), 2);
        assert!(index.overlaps(&square(3.5, 0.2, 0.1)));
        assert_eq!(index.iter().count(), 2);
    }

    #[test]
    fn empty_candidate_never_overlaps() {
        let existing = vec![square(0.0, 0.0, 1.0)];
        assert!(!overlaps(&Bvh::default(), &existing));
        assert!(overlaps(&square(0.0, 0.0, 1.0), &existing));
    }
}
