//! Field-weighted point cloud for random placement.
use glam::Vec3;
use rand::Rng;

use crate::sampling::{rand01, rand_index, Candidate, CandidateSource, Draw};
use crate::surface::field::ScalarField;
use crate::surface::Surface;

/// Unordered candidate pool drawn from uniformly at random.
///
/// Every draw removes the candidate, whether it passes the weight test or not.
#[derive(Debug, Clone, Default)]
pub struct WeightedPointCloud {
    points: Vec<Candidate>,
}

impl WeightedPointCloud {
    /// Builds the pool from surface vertices in index order.
    ///
    /// With a field, only vertices whose value meets `cutoff` are included and
    /// their value becomes the weight; without one every vertex is included
    /// with weight 1. When `align_to_normal` is false each candidate normal is
    /// `up_axis`.
    pub fn from_surface(
        surface: &Surface,
        field: Option<&ScalarField>,
        cutoff: f32,
        align_to_normal: bool,
        up_axis: Vec3,
    ) -> Self {
        let points = surface
            .vertices()
            .iter()
            .enumerate()
            .filter_map(|(i, v)| {
                let vertex = i as u32;
                let weight = match field {
                    Some(field) if field.meets_cutoff(vertex, cutoff) => field.value(vertex),
                    Some(_) => return None,
                    None => 1.0,
                };
                Some(Candidate {
                    vertex,
                    position: v.position,
                    normal: if align_to_normal { v.normal } else { up_axis },
                    weight,
                })
            })
            .collect();
        Self { points }
    }

    /// Wraps an explicit list of candidates.
    pub fn from_candidates(points: Vec<Candidate>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.points
    }
}

impl CandidateSource for WeightedPointCloud {
    fn remaining(&self) -> usize {
        self.points.len()
    }

    fn draw(&mut self, rng: &mut dyn Rng) -> Draw {
        if self.points.is_empty() {
            return Draw::Exhausted;
        }

        let index = rand_index(rng, self.points.len());
        let roll = rand01(rng);
        let candidate = self.points.swap_remove(index);
        if candidate.weight < roll {
            Draw::Skipped { candidate, roll }
        } else {
            Draw::Ready(candidate)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::DEFAULT_FIELD_CUTOFF;
    use crate::surface::SurfaceBuilder;

    fn tilted_grid() -> Surface {
        let mut builder = SurfaceBuilder::new("tilted");
        for i in 0..4 {
            builder.push_vertex([i as f32, 0.0, 0.0], [1.0, 0.0, 0.0]);
        }
        builder.push_polygon(&[0, 1, 2, 3]);
        builder
            .with_vertex_colors(|i, _| {
                let v = [0.0, 0.5, 0.49, 0.9][i as usize];
                [v, v, v, 1.0]
            })
            .build()
            .unwrap()
    }

    #[test]
    fn without_field_every_vertex_has_unit_weight() {
        let surface = tilted_grid();
        let cloud =
            WeightedPointCloud::from_surface(&surface, None, DEFAULT_FIELD_CUTOFF, false, Vec3::Z);
        assert_eq!(cloud.len(), 4);
        assert!(cloud.as_slice().iter().all(|c| c.weight == 1.0));
        assert!(cloud.as_slice().iter().all(|c| c.normal == Vec3::Z));
    }

    #[test]
    fn field_filters_by_inclusive_cutoff_and_sets_weight() {
        let surface = tilted_grid();
        let field = ScalarField::from_surface(&surface).unwrap();
        let cloud = WeightedPointCloud::from_surface(
            &surface,
            Some(&field),
            DEFAULT_FIELD_CUTOFF,
            true,
            Vec3::Z,
        );
        let vertices: Vec<u32> = cloud.as_slice().iter().map(|c| c.vertex).collect();
        assert_eq!(vertices, vec![1, 3]);
        assert_eq!(cloud.as_slice()[0].weight, 0.5);
        assert_eq!(cloud.as_slice()[1].weight, 0.9);
        assert!(cloud.as_slice().iter().all(|c| c.normal == Vec3::X));
    }

    #[test]
    fn every_draw_consumes_a_candidate() {
        let surface = SurfaceBuilder::grid("grid", 4, 4, 1.0).build().unwrap();
        let mut cloud =
            WeightedPointCloud::from_surface(&surface, None, DEFAULT_FIELD_CUTOFF, false, Vec3::Z);
        let mut rng = StdRng::seed_from_u64(3);

        let mut seen = HashSet::new();
        for expected_remaining in (0..16).rev() {
            match cloud.draw(&mut rng) {
                Draw::Ready(c) => assert!(seen.insert(c.vertex)),
                other => panic!("unit weights never skip, got {other:?}"),
            }
            assert_eq!(cloud.remaining(), expected_remaining);
        }
        assert_eq!(cloud.draw(&mut rng), Draw::Exhausted);
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn zero_weight_candidates_are_skipped_and_removed() {
        let zero = Candidate {
            vertex: 0,
            position: Vec3::ZERO,
            normal: Vec3::Z,
            weight: 0.0,
        };
        let mut cloud = WeightedPointCloud::from_candidates(vec![zero; 8]);
        let mut rng = StdRng::seed_from_u64(11);
        let mut skipped = 0;
        loop {
            match cloud.draw(&mut rng) {
                Draw::Exhausted => break,
                Draw::Skipped { roll, .. } => {
                    assert!(roll > 0.0);
                    skipped += 1;
                }
                Draw::Ready(_) => {
                    // Only possible when the roll is exactly 0.
                }
            }
        }
        assert!(skipped >= 7);
        assert!(cloud.is_empty());
    }

    #[test]
    fn draws_are_deterministic_for_same_seed() {
        let surface = SurfaceBuilder::grid("grid", 6, 6, 1.0).build().unwrap();
        let make = || {
            WeightedPointCloud::from_surface(&surface, None, DEFAULT_FIELD_CUTOFF, false, Vec3::Z)
        };
        let (mut a, mut b) = (make(), make());
        let mut rng_a = StdRng::seed_from_u64(123);
        let mut rng_b = StdRng::seed_from_u64(123);
        for _ in 0..36 {
            assert_eq!(a.draw(&mut rng_a), b.draw(&mut rng_b));
        }
    }
}
