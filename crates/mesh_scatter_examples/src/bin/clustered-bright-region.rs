use glam::Vec3;
use mesh_scatter::prelude::*;
use mesh_scatter_examples::{init_tracing, render_instances_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // A bright disc in the middle of a dark grid.
    let size = 48;
    let center = (size as f32 - 1.0) * 0.5;
    let surface = SurfaceBuilder::grid("disc", size, size, 1.0)
        .with_vertex_colors(|i, _| {
            let (x, y) = ((i % size) as f32, (i / size) as f32);
            let d = ((x - center).powi(2) + (y - center).powi(2)).sqrt();
            let v = if d < 14.0 { 1.0 } else { 0.1 };
            [v, v, v, 1.0]
        })
        .build()?;
    let field = ScalarField::from_surface(&surface)?;
    let shrub = Prototype::cuboid("shrub", Vec3::new(0.6, 0.6, 0.4));

    // The walk starts at the center vertex and never leaves the bright interior.
    let start = (size / 2) * size + size / 2;
    let config = ScatterConfig::new(500)
        .with_seed(start as u64)
        .with_field(true);
    let runner = ScatterRunner::try_new(config, &surface, &shrub)?;

    let mut sink = VecSink::new().only([PlacementEventKind::Warning]);
    let result = runner.run_with_events(ScatterMode::Clustered, &mut sink)?;
    for event in sink.into_inner() {
        if let PlacementEvent::Warning { context, message } = event {
            println!("warning [{context}]: {message}");
        }
    }

    let rc = RenderConfig::fit_surface((900, 900), &surface, 1.0)
        .with_instance_colors([60, 170, 90], [200, 255, 210]);
    render_instances_to_png(
        &surface,
        Some(&field),
        &result.instances,
        &rc,
        "clustered-bright-region.png",
    )?;

    Ok(())
}
