mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use mesh_scatter::prelude::*;

const GRID_SIZES: [u32; 3] = [32, 64, 128];
const COUNTS: [usize; 3] = [16, 128, 512];

fn placement_random_benches(c: &mut Criterion) {
    let prototype = Prototype::cuboid("pebble", Vec3::splat(0.4));

    for &size in &GRID_SIZES {
        let surface = common::gradient_surface(size);
        let mut group = c.benchmark_group(format!("placement/random/grid_{size}"));

        for &count in &COUNTS {
            group.throughput(common::vertices_throughput(count));
            group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
                b.iter(|| {
                    let placed =
                        place_random(&surface, &prototype, count, 0xC0FFEE, true, false).unwrap();
                    black_box(placed.len());
                });
            });
        }

        group.finish();
    }
}

fn placement_clustered_benches(c: &mut Criterion) {
    let prototype = Prototype::unit_cube("crate");

    for &size in &GRID_SIZES {
        let surface = common::gradient_surface(size);
        let mut group = c.benchmark_group(format!("placement/clustered/grid_{size}"));

        for &count in &COUNTS {
            group.throughput(common::vertices_throughput(count));
            group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
                b.iter(|| {
                    let placed =
                        place_clustered(&surface, &prototype, count, 0, false, true).unwrap();
                    black_box(placed.len());
                });
            });
        }

        group.finish();
    }
}

fn bounds_overlap_benches(c: &mut Criterion) {
    let prototype = Prototype::unit_cube("crate");
    let mut group = c.benchmark_group("placement/bounds_index");

    for &committed in &COUNTS {
        let mut index = BoundsIndex::with_capacity(committed);
        for i in 0..committed {
            let pose = Pose::new(Vec3::new(i as f32 * 2.0, 0.0, 0.0), Default::default());
            index.commit(prototype.world_bounds(&pose).into());
        }
        let probe = prototype.world_bounds(&Pose::new(
            Vec3::new(committed as f32, 0.0, 0.0),
            Default::default(),
        ));

        group.throughput(common::vertices_throughput(committed));
        group.bench_with_input(
            BenchmarkId::from_parameter(committed),
            &committed,
            |b, _| {
                b.iter(|| black_box(index.overlaps(&probe)));
            },
        );
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = placement_random_benches, placement_clustered_benches, bounds_overlap_benches
}
criterion_main!(benches);
