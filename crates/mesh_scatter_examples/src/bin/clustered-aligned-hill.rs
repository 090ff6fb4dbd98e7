use glam::Vec3;
use mesh_scatter::prelude::*;
use mesh_scatter_examples::{init_tracing, render_instances_to_png, RenderConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Bumpy heightfield; normals come from central differences.
    let size = 40u32;
    let mut rng = StdRng::seed_from_u64(7);
    let heights: Vec<f32> = (0..size * size)
        .map(|i| {
            let (x, y) = ((i % size) as f32, (i / size) as f32);
            (x * 0.25).sin() * (y * 0.2).cos() * 2.0 + (rng.next_u32() as f32 / u32::MAX as f32 - 0.5) * 0.1
        })
        .collect();
    let height = |x: i64, y: i64| {
        let x = x.clamp(0, size as i64 - 1) as u32;
        let y = y.clamp(0, size as i64 - 1) as u32;
        heights[(y * size + x) as usize]
    };

    let mut builder = SurfaceBuilder::new("hill");
    for i in 0..size * size {
        let (x, y) = ((i % size) as i64, (i / size) as i64);
        let dx = (height(x + 1, y) - height(x - 1, y)) * 0.5;
        let dy = (height(x, y + 1) - height(x, y - 1)) * 0.5;
        builder.push_vertex(
            Vec3::new(x as f32, y as f32, height(x, y)),
            Vec3::new(-dx, -dy, 1.0).normalize(),
        );
    }
    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let i = y * size + x;
            builder.push_polygon(&[i, i + 1, i + size + 1, i + size]);
        }
    }
    let surface = builder.build()?;
    let post = Prototype::cuboid("post", Vec3::new(0.2, 0.2, 1.0));

    // Posts stand along the local surface normal.
    let aligned = place_clustered(&surface, &post, 200, 0, false, true)?;
    let tilted = aligned
        .iter()
        .filter(|i| (i.pose.rotation * Vec3::Z).dot(Vec3::Z) < 0.99)
        .count();
    println!("placed {} posts, {} visibly tilted", aligned.len(), tilted);

    let rc = RenderConfig::fit_surface((900, 900), &surface, 1.0);
    render_instances_to_png(&surface, None, &aligned, &rc, "clustered-aligned-hill.png")?;

    Ok(())
}
