/// Benchmarks for snapshot rebuilds and visibility sweeps over generated terrain
use std::rc::Rc;

use cgmath::{Point2, Point3};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voxel_sight::{
    BlockRegistry, Dir, FaceBuilder, HeightMap, Position, VisitRecorder, World, WorldConfig,
};

fn terrain_world(max_view_distance: u32) -> (World, Position) {
    let registry = Rc::new(BlockRegistry::with_default_blocks());
    let grass = registry.id_by_name("grass").unwrap_or(1);
    let config = WorldConfig {
        max_view_distance,
        ..WorldConfig::default()
    };
    let mut world = World::new(config, registry).unwrap();
    let map = HeightMap::diamond_square(7, 0.55, 7);
    let half = (map.size() / 2) as i32;
    world.apply_heightmap(&map, Point2::new(-half, -half), 2, grass);

    let eye_y = 2 + map.height(map.size() / 2, map.size() / 2) + 3;
    (world, Position::new(Point3::new(0, eye_y, 0), Dir::North))
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("volume_rebuild");

    for &distance in &[16u32, 32, 60] {
        let (world, position) = terrain_world(distance);
        group.bench_with_input(BenchmarkId::from_parameter(distance), &distance, |b, _| {
            b.iter(|| world.rebuild_volume(black_box(position.pos)).unwrap());
        });
    }
    group.finish();
}

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("visibility_traversal");

    for &distance in &[16u32, 32, 60] {
        let (world, position) = terrain_world(distance);
        world.rebuild_volume(position.pos).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(distance), &distance, |b, _| {
            let mut recorder = VisitRecorder::new();
            b.iter(|| {
                recorder.clear();
                black_box(world.visit_visible_cells(&position, &mut recorder).unwrap())
            });
        });
    }
    group.finish();
}

fn bench_face_building(c: &mut Criterion) {
    c.bench_function("face_builder_32", |b| {
        let (world, position) = terrain_world(32);
        let mut builder = FaceBuilder::new();
        b.iter(|| {
            world.visit_visible_cells(&position, &mut builder).unwrap();
            black_box(builder.packed().len())
        });
    });
}

criterion_group!(benches, bench_rebuild, bench_traversal, bench_face_building);
criterion_main!(benches);
