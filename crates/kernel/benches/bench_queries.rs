use std::hint::black_box;
use std::time::Instant;

use glam::{Vec2, Vec3};
use trailwalk_common::{Aabb, MotionIntent};
use trailwalk_kernel::{
    CharacterConfig, CharacterController, ColliderSet, ColliderSetBuilder, TerrainSampler,
    TriangleMesh,
};

fn make_colliders(count: usize, spacing: f32) -> ColliderSet {
    let mut builder = ColliderSetBuilder::new();
    let side = (count as f32).sqrt().ceil() as usize;
    for i in 0..count {
        let x = (i % side) as f32 * spacing + 5.0;
        let z = (i / side) as f32 * spacing + 5.0;
        let bounds = Aabb::from_center_half_extents(Vec3::new(x, 1.0, z), Vec3::splat(1.0));
        if let Err(e) = builder.register(format!("Object_{i}"), bounds) {
            eprintln!("failed to register bench collider: {e}");
        }
    }
    builder.build()
}

fn make_terrain(resolution: usize) -> TerrainSampler {
    let heights: Vec<Vec<f32>> = (0..resolution)
        .map(|row| {
            (0..resolution)
                .map(|col| ((row as f32) * 0.3).sin() + ((col as f32) * 0.2).cos())
                .collect()
        })
        .collect();
    let mut sampler = TerrainSampler::new(100.0);
    match TriangleMesh::from_height_grid("bench_terrain", Vec2::splat(-100.0), 200.0 / resolution as f32, &heights) {
        Ok(mesh) => sampler.register(mesh),
        Err(e) => eprintln!("failed to build bench terrain: {e}"),
    }
    sampler
}

fn bench_would_collide(count: usize, iterations: usize) {
    let set = make_colliders(count, 4.0);
    let probe = Aabb::upright(Vec3::new(-3.0, 0.0, -3.0), 0.35, 1.8);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(set.would_collide(black_box(&probe)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  would_collide ({count} boxes, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_ground_sample(resolution: usize, iterations: usize) {
    let sampler = make_terrain(resolution);

    let start = Instant::now();
    for i in 0..iterations {
        let xz = Vec2::new((i % 150) as f32 - 75.0, ((i / 150) % 150) as f32 - 75.0);
        let _ = black_box(sampler.sample_ground_height(black_box(xz)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  ground sample ({resolution}x{resolution} grid, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_controller_step(boxes: usize, iterations: usize) {
    let colliders = make_colliders(boxes, 4.0);
    let terrain = make_terrain(32);
    let mut ctrl = CharacterController::new(CharacterConfig::default());
    let intent = MotionIntent::new(Vec2::new(0.3, 1.0), false);

    let start = Instant::now();
    for i in 0..iterations {
        let yaw = (i as f32) * 0.01;
        let _ = black_box(ctrl.step(intent, yaw, 1.0 / 60.0, Some(&colliders), Some(&terrain)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  controller step ({boxes} boxes, 32x32 terrain, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Kernel Query Benchmarks ===\n");

    println!("Collider scan:");
    bench_would_collide(10, 100_000);
    bench_would_collide(50, 100_000);
    bench_would_collide(500, 10_000);

    println!("\nTerrain ray cast:");
    bench_ground_sample(16, 10_000);
    bench_ground_sample(64, 1_000);
    bench_ground_sample(128, 100);

    println!("\nFull controller step:");
    bench_controller_step(10, 10_000);
    bench_controller_step(50, 10_000);

    println!("\n=== Done ===");
}
