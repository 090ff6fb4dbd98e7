#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use mesh_scatter::prelude::{ScalarField, Surface, SurfaceBuilder};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_millis(500);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

/// Shared criterion settings for all bench groups.
pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

/// Throughput in surface vertices or placed instances.
pub fn vertices_throughput(vertices: usize) -> Throughput {
    Throughput::Elements(vertices.max(1) as u64)
}

/// Square grid whose brightness rises from 0 on the left column to 1 on the right.
pub fn gradient_surface(size: u32) -> Surface {
    SurfaceBuilder::grid(format!("gradient_{size}"), size, size, 1.0)
        .with_vertex_colors(|i, _| {
            let v = (i % size) as f32 / (size - 1).max(1) as f32;
            [v, v, v, 1.0]
        })
        .build()
        .unwrap()
}

/// Square grid with a bright disc in the middle fading to dark at the border.
pub fn disc_surface(size: u32) -> Surface {
    let r = size as f32 * 0.5;
    SurfaceBuilder::grid(format!("disc_{size}"), size, size, 1.0)
        .with_vertex_colors(|i, _| {
            let (x, y) = ((i % size) as f32, (i / size) as f32);
            let d = ((x - r).powi(2) + (y - r).powi(2)).sqrt() / r;
            let v = ((1.0 - d).clamp(0.0, 1.0) * 2.0).min(1.0);
            [v, 0.0, 0.0, 1.0]
        })
        .build()
        .unwrap()
}

/// Plain grid without a color layer.
pub fn flat_surface(size: u32) -> Surface {
    SurfaceBuilder::grid(format!("flat_{size}"), size, size, 1.0)
        .build()
        .unwrap()
}

/// Surface together with its baked field.
pub fn with_field(surface: Surface) -> (Surface, ScalarField) {
    let field = ScalarField::from_surface(&surface).unwrap();
    (surface, field)
}

/// Index of the vertex nearest the grid center.
pub fn center_vertex(size: u32) -> u32 {
    size * (size / 2) + size / 2
}
