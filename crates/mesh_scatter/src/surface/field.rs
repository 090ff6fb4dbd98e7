//! Per-vertex scalar field derived from a surface's baked color layer.
use tracing::debug;

use crate::error::{Error, Result};
use crate::surface::Surface;

/// Value assigned to vertices that no loop references.
pub const DEFAULT_FIELD_VALUE: f32 = 0.0;

/// One scalar value per surface vertex, nominally in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    values: Vec<f32>,
}

impl ScalarField {
    /// Averages the first color channel of every loop that references a vertex.
    ///
    /// Vertices without loops keep [`DEFAULT_FIELD_VALUE`]. Fails with
    /// [`Error::MissingField`] when the surface has no color layer at all.
    pub fn from_surface(surface: &Surface) -> Result<Self> {
        let colors = surface.color_layer().ok_or_else(|| Error::MissingField {
            surface: surface.name().to_owned(),
        })?;

        let mut sums = vec![0.0f32; surface.vertex_count()];
        let mut counts = vec![0u32; surface.vertex_count()];
        for polygon in surface.polygons() {
            for loop_idx in polygon.loop_indices() {
                let v = surface.loops()[loop_idx] as usize;
                sums[v] += colors[loop_idx][0];
                counts[v] += 1;
            }
        }

        let values: Vec<f32> = sums
            .into_iter()
            .zip(counts)
            .map(|(sum, count)| {
                if count == 0 {
                    DEFAULT_FIELD_VALUE
                } else {
                    sum / count as f32
                }
            })
            .collect();

        debug!(
            "Derived scalar field for '{}' over {} vertices.",
            surface.name(),
            values.len()
        );
        Ok(Self { values })
    }

    /// Wraps precomputed per-vertex values.
    pub fn from_values(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Value at `vertex`, or [`DEFAULT_FIELD_VALUE`] when out of range.
    #[inline]
    pub fn value(&self, vertex: u32) -> f32 {
        self.values
            .get(vertex as usize)
            .copied()
            .unwrap_or(DEFAULT_FIELD_VALUE)
    }

    /// Inclusive cutoff test.
    #[inline]
    pub fn meets_cutoff(&self, vertex: u32, cutoff: f32) -> bool {
        self.value(vertex) >= cutoff
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceBuilder;

    #[test]
    fn averages_first_channel_over_loops() {
        let mut builder = SurfaceBuilder::new("tris");
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]] {
            builder.push_vertex(p, [0.0, 0.0, 1.0]);
        }
        builder.push_polygon(&[0, 1, 2]);
        builder.push_polygon(&[0, 2, 3]);
        // Vertex 0 and 2 appear twice with differing colors.
        let surface = builder
            .with_loop_colors(vec![
                [1.0, 0.0, 0.0, 1.0],
                [0.4, 9.0, 9.0, 1.0],
                [0.2, 0.0, 0.0, 1.0],
                [0.0, 0.0, 0.0, 1.0],
                [0.6, 0.0, 0.0, 1.0],
                [0.8, 0.0, 0.0, 1.0],
            ])
            .build()
            .unwrap();

        let field = ScalarField::from_surface(&surface).unwrap();
        assert_eq!(field.len(), 4);
        assert!((field.value(0) - 0.5).abs() < 1e-6);
        assert!((field.value(1) - 0.4).abs() < 1e-6);
        assert!((field.value(2) - 0.4).abs() < 1e-6);
        assert!((field.value(3) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn unreferenced_vertices_default_to_zero() {
        let mut builder = SurfaceBuilder::grid("grid", 2, 2, 1.0);
        let lonely = builder.push_vertex([5.0, 5.0, 0.0], [0.0, 0.0, 1.0]);
        let surface = builder.with_uniform_color(1.0).build().unwrap();

        let field = ScalarField::from_surface(&surface).unwrap();
        assert_eq!(field.value(0), 1.0);
        assert_eq!(field.value(lonely), DEFAULT_FIELD_VALUE);
    }

    #[test]
    fn missing_color_layer_is_an_error() {
        let surface = SurfaceBuilder::grid("bare", 2, 2, 1.0).build().unwrap();
        let err = ScalarField::from_surface(&surface).unwrap_err();
        assert!(matches!(err, Error::MissingField { ref surface } if surface == "bare"));
    }

    #[test]
    fn cutoff_is_inclusive() {
        let field = ScalarField::from_values(vec![0.5, 0.499_999, 1.0]);
        assert!(field.meets_cutoff(0, 0.5));
        assert!(!field.meets_cutoff(1, 0.5));
        assert!(field.meets_cutoff(2, 0.5));
        assert!(!field.meets_cutoff(7, 0.5));
    }
}
