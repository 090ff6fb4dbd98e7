//! Immutable surface meshes that instances are scattered across.
//!
//! A [`Surface`] mirrors the layout host applications use for editable meshes:
//! vertices with position and normal, undirected edges, polygons made of loops
//! (one loop per polygon corner, each referencing a vertex), and an optional
//! per-loop color layer from which the scalar field is derived.
//!
//! Surfaces are assembled with [`SurfaceBuilder`], which validates every index
//! before handing out the immutable view.
use std::collections::HashSet;
use std::ops::Range;

use glam::Vec3;

use crate::error::{Error, Result};

pub mod field;
pub mod graph;

/// A surface vertex in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position relative to the surface origin.
    pub position: Vec3,
    /// Vertex normal. Not required to be normalized.
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// A polygon as a contiguous run of loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polygon {
    /// Index of the first loop of this polygon.
    pub loop_start: usize,
    /// Number of loops (corners) in this polygon.
    pub loop_total: usize,
}

impl Polygon {
    /// Range of loop indices belonging to this polygon.
    pub fn loop_indices(&self) -> Range<usize> {
        self.loop_start..self.loop_start + self.loop_total
    }
}

/// Read-only view over a base mesh. The placement engine never mutates it.
#[derive(Debug, Clone)]
pub struct Surface {
    name: String,
    origin: Vec3,
    vertices: Vec<Vertex>,
    edges: Vec<[u32; 2]>,
    polygons: Vec<Polygon>,
    loops: Vec<u32>,
    color_layer: Option<Vec<[f32; 4]>>,
}

impl Surface {
    /// Name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// World-space origin of the surface.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, index: u32) -> Option<&Vertex> {
        self.vertices.get(index as usize)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Vertex index referenced by each loop.
    pub fn loops(&self) -> &[u32] {
        &self.loops
    }

    /// Per-loop RGBA samples, if the surface carries a color layer.
    pub fn color_layer(&self) -> Option<&[[f32; 4]]> {
        self.color_layer.as_deref()
    }
}

/// Incremental, validating constructor for [`Surface`].
#[derive(Debug, Clone, Default)]
pub struct SurfaceBuilder {
    name: String,
    origin: Vec3,
    vertices: Vec<Vertex>,
    edges: Vec<[u32; 2]>,
    edge_set: HashSet<(u32, u32)>,
    polygons: Vec<Polygon>,
    loops: Vec<u32>,
    color_layer: Option<Vec<[f32; 4]>>,
}

impl SurfaceBuilder {
    /// Creates an empty builder for a surface with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Flat grid of `cols` x `rows` vertices in the XY plane, `spacing` apart,
    /// with +Z normals and one quad per grid cell. Vertex `i` sits at
    /// column `i % cols`, row `i / cols`.
    pub fn grid(name: impl Into<String>, cols: u32, rows: u32, spacing: f32) -> Self {
        let mut builder = Self::new(name);
        for row in 0..rows {
            for col in 0..cols {
                builder.push_vertex(
                    Vec3::new(col as f32 * spacing, row as f32 * spacing, 0.0),
                    Vec3::Z,
                );
            }
        }
        for row in 0..rows.saturating_sub(1) {
            for col in 0..cols.saturating_sub(1) {
                let a = row * cols + col;
                let b = a + 1;
                let c = b + cols;
                let d = a + cols;
                builder.push_polygon(&[a, b, c, d]);
            }
        }
        builder
    }

    /// Sets the world-space origin of the surface.
    pub fn with_origin(mut self, origin: impl Into<mint::Vector3<f32>>) -> Self {
        self.origin = Vec3::from(origin.into());
        self
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(
        &mut self,
        position: impl Into<mint::Vector3<f32>>,
        normal: impl Into<mint::Vector3<f32>>,
    ) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(Vertex::new(
            Vec3::from(position.into()),
            Vec3::from(normal.into()),
        ));
        index
    }

    /// Adds an undirected edge unless it already exists.
    pub fn push_edge(&mut self, a: u32, b: u32) {
        let key = (a.min(b), a.max(b));
        if self.edge_set.insert(key) {
            self.edges.push([a, b]);
        }
    }

    /// Adds a polygon with one loop per listed vertex and its boundary edges.
    pub fn push_polygon(&mut self, corners: &[u32]) {
        let loop_start = self.loops.len();
        self.loops.extend_from_slice(corners);
        self.polygons.push(Polygon {
            loop_start,
            loop_total: corners.len(),
        });
        for (i, &a) in corners.iter().enumerate() {
            let b = corners[(i + 1) % corners.len()];
            if a != b {
                self.push_edge(a, b);
            }
        }
    }

    /// Sets the per-loop color layer directly.
    pub fn with_loop_colors(mut self, colors: Vec<[f32; 4]>) -> Self {
        self.color_layer = Some(colors);
        self
    }

    /// Fills the color layer from a per-vertex function, writing the same
    /// color into every loop of a vertex. Call after all polygons are added.
    pub fn with_vertex_colors<F>(mut self, mut color: F) -> Self
    where
        F: FnMut(u32, &Vertex) -> [f32; 4],
    {
        let colors = self
            .loops
            .iter()
            .map(|&v| match self.vertices.get(v as usize) {
                Some(vertex) => color(v, vertex),
                None => [0.0; 4],
            })
            .collect();
        self.color_layer = Some(colors);
        self
    }

    /// Fills the color layer with a single grey value.
    pub fn with_uniform_color(self, value: f32) -> Self {
        self.with_vertex_colors(|_, _| [value, value, value, 1.0])
    }

    /// Validates indices and produces the immutable [`Surface`].
    pub fn build(self) -> Result<Surface> {
        let vertex_count = self.vertices.len();

        for (i, v) in self.vertices.iter().enumerate() {
            if !v.position.is_finite() || !v.normal.is_finite() {
                return Err(Error::InvalidSurface(format!(
                    "vertex {i} has a non-finite position or normal"
                )));
            }
        }

        for &[a, b] in &self.edges {
            if a as usize >= vertex_count || b as usize >= vertex_count {
                return Err(Error::InvalidSurface(format!(
                    "edge ({a}, {b}) references a vertex outside 0..{vertex_count}"
                )));
            }
            if a == b {
                return Err(Error::InvalidSurface(format!(
                    "edge ({a}, {b}) connects a vertex to itself"
                )));
            }
        }

        if let Some(&v) = self.loops.iter().find(|&&v| v as usize >= vertex_count) {
            return Err(Error::InvalidSurface(format!(
                "loop references vertex {v} outside 0..{vertex_count}"
            )));
        }

        for (i, polygon) in self.polygons.iter().enumerate() {
            if polygon.loop_total < 3 {
                return Err(Error::InvalidSurface(format!(
                    "polygon {i} has {} corners, need at least 3",
                    polygon.loop_total
                )));
            }
            if polygon.loop_indices().end > self.loops.len() {
                return Err(Error::InvalidSurface(format!(
                    "polygon {i} loops run past the loop array"
                )));
            }
        }

        if let Some(colors) = &self.color_layer {
            if colors.len() != self.loops.len() {
                return Err(Error::InvalidSurface(format!(
                    "color layer has {} samples for {} loops",
                    colors.len(),
                    self.loops.len()
                )));
            }
        }

        Ok(Surface {
            name: self.name,
            origin: self.origin,
            vertices: self.vertices,
            edges: self.edges,
            polygons: self.polygons,
            loops: self.loops,
            color_layer: self.color_layer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_expected_topology() {
        let surface = SurfaceBuilder::grid("grid", 3, 2, 1.0).build().unwrap();
        assert_eq!(surface.vertex_count(), 6);
        assert_eq!(surface.polygons().len(), 2);
        assert_eq!(surface.loops().len(), 8);
        // 3 columns x 2 rows: 2*2 horizontal + 3 vertical edges
        assert_eq!(surface.edges().len(), 7);
        assert_eq!(surface.vertex(4).unwrap().position, Vec3::new(1.0, 1.0, 0.0));
        assert!(surface.color_layer().is_none());
    }

    #[test]
    fn shared_edges_are_not_duplicated() {
        let mut builder = SurfaceBuilder::new("pair");
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]] {
            builder.push_vertex(p, [0.0, 0.0, 1.0]);
        }
        builder.push_polygon(&[0, 1, 2]);
        builder.push_polygon(&[0, 2, 3]);
        let surface = builder.build().unwrap();
        assert_eq!(surface.edges().len(), 5);
    }

    #[test]
    fn vertex_colors_are_written_per_loop() {
        let surface = SurfaceBuilder::grid("grid", 2, 2, 1.0)
            .with_vertex_colors(|i, _| [i as f32, 0.0, 0.0, 1.0])
            .build()
            .unwrap();
        let colors = surface.color_layer().unwrap();
        for (loop_idx, &v) in surface.loops().iter().enumerate() {
            assert_eq!(colors[loop_idx][0], v as f32);
        }
    }

    #[test]
    fn origin_is_kept() {
        let surface = SurfaceBuilder::grid("grid", 2, 2, 1.0)
            .with_origin(Vec3::new(5.0, -1.0, 2.0))
            .build()
            .unwrap();
        assert_eq!(surface.origin(), Vec3::new(5.0, -1.0, 2.0));
    }

    #[test]
    fn rejects_out_of_range_edges() {
        let mut builder = SurfaceBuilder::new("bad");
        builder.push_vertex([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        builder.push_edge(0, 3);
        assert!(matches!(builder.build(), Err(Error::InvalidSurface(_))));
    }

    #[test]
    fn rejects_mismatched_color_layer() {
        let result = SurfaceBuilder::grid("grid", 2, 2, 1.0)
            .with_loop_colors(vec![[1.0; 4]; 3])
            .build();
        assert!(matches!(result, Err(Error::InvalidSurface(_))));
    }

    #[test]
    fn rejects_degenerate_polygons() {
        let mut builder = SurfaceBuilder::new("bad");
        builder.push_vertex([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        builder.push_vertex([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        builder.push_polygon(&[0, 1]);
        assert!(matches!(builder.build(), Err(Error::InvalidSurface(_))));
    }
}
