use mesh_scatter::prelude::*;
use mesh_scatter_examples::{init_tracing, render_instances_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Flat 40x40 grid with unit spacing.
    let surface = SurfaceBuilder::grid("ground", 40, 40, 1.0).build()?;
    let crate_proto = Prototype::unit_cube("crate");

    // Unweighted random placement; touching cubes are rejected.
    let instances = place_random(&surface, &crate_proto, 150, 2025, false, false)?;

    let rc = RenderConfig::fit_surface((800, 800), &surface, 1.0)
        .with_background([26, 26, 26])
        .with_instance_colors([235, 160, 60], [255, 230, 180]);
    render_instances_to_png(&surface, None, &instances, &rc, "random-grid-basic.png")?;

    println!("placed {} of 150 crates", instances.len());
    Ok(())
}
