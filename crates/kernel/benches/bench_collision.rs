use std::hint::black_box;
use std::time::Instant;

use groundplane_common::{Point2, Pose};
use groundplane_geometry::BoundingBox;
use groundplane_input::Controls;
use groundplane_kernel::{MovementPlanner, World, WorldObject, run_collision_detection};

/// Obstacles on a square grid starting at `(origin, origin)`.
fn make_world(object_count: usize, spacing: f64, origin: f64) -> World {
    let side = (object_count as f64).sqrt().ceil() as usize;
    let extent = origin.abs() + side as f64 * spacing;
    let mut world = World::new(extent, extent);
    for i in 0..object_count {
        let x = origin + (i % side) as f64 * spacing;
        let z = origin + (i / side) as f64 * spacing;
        world.add_object(WorldObject::new(
            x,
            z,
            i as f64 * 0.1,
            BoundingBox::from_half_extents(0.5, 0.25),
        ));
    }
    world
}

fn bench_oracle(object_count: usize, iterations: usize) {
    let world = make_world(object_count, 4.0, -20.0);
    let bbox = BoundingBox::default();
    // Between grid columns, so every obstacle is tested.
    let candidate = Pose::new(Point2::new(-18.0, -18.0), 0.3);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(run_collision_detection(
            black_box(&candidate),
            black_box(&world),
            black_box(&bbox),
        ));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  oracle ({object_count} obstacles, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_tick(object_count: usize, iterations: usize) {
    let world = make_world(object_count, 4.0, -20.0);
    let bbox = BoundingBox::default();
    let planner = MovementPlanner::default();
    let inputs: [Controls; 4] = ["w", "wd", "s", "a"].map(|k| k.parse().unwrap_or_default());

    let mut pose = Pose::default();
    let start = Instant::now();
    for i in 0..iterations {
        let controls = &inputs[i % inputs.len()];
        pose = planner
            .plan(black_box(&pose), controls, 5.0, 1.0 / 60.0, black_box(&world), &bbox)
            .pose();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  planned tick ({object_count} obstacles, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
    black_box(pose);
}

fn main() {
    println!("=== Collision Oracle Benchmarks ===\n");

    println!("Full-scan oracle:");
    bench_oracle(10, 100_000);
    bench_oracle(100, 10_000);
    bench_oracle(1000, 1000);

    println!("\nPlanned tick (plan + oracle):");
    bench_tick(10, 100_000);
    bench_tick(100, 10_000);
    bench_tick(1000, 1000);

    println!("\n=== Done ===");
}
