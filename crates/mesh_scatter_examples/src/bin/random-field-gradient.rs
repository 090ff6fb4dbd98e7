use mesh_scatter::prelude::*;
use mesh_scatter_examples::{init_tracing, render_instances_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Brightness rises from 0 on the left edge to 1 on the right edge.
    let size = 60;
    let surface = SurfaceBuilder::grid("gradient", size, size, 1.0)
        .with_vertex_colors(|i, _| {
            let u = (i % size) as f32 / (size - 1) as f32;
            [u, u, u, 1.0]
        })
        .build()?;
    let field = ScalarField::from_surface(&surface)?;
    let pebble = Prototype::cuboid("pebble", glam::Vec3::splat(0.35));

    // Only vertices at or above the cutoff are candidates; each is kept with
    // probability equal to its brightness.
    let config = ScatterConfig::new(400).with_seed(42).with_field(true);
    let runner = ScatterRunner::try_new(config, &surface, &pebble)?;
    let result = runner.run(ScatterMode::Random)?;

    println!(
        "placed {} | skipped by weight {} | rejected by overlap {} | exhausted {}",
        result.instances.len(),
        result.skipped_by_weight,
        result.rejected_by_overlap,
        result.exhausted,
    );

    let rc = RenderConfig::fit_surface((900, 900), &surface, 1.0);
    render_instances_to_png(
        &surface,
        Some(&field),
        &result.instances,
        &rc,
        "random-field-gradient.png",
    )?;

    Ok(())
}
