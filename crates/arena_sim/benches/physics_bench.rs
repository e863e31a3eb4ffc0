//! # Physics Tick Benchmark
//!
//! Measures the cost of one full substep pass over worlds of varying
//! population, with the O(n²) pairwise collision phase both on and off.
//!
//! Run with: `cargo bench --package arena_sim`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use arena_sim::{PhysicsBody, SimConfig, Simulation};

/// One substep at the default tick rate.
const SUBSTEP: f32 = 1.0 / 300.0;

/// Spawns `count` bodies in a loose grid, spaced to avoid contacts.
fn sparse_world(count: usize, collisions: bool) -> Simulation {
    let mut sim = Simulation::new(SimConfig {
        entity_capacity: count.max(1),
        ..SimConfig::default()
    });
    for i in 0..count {
        let e = sim.world_mut().spawn();
        #[allow(clippy::cast_precision_loss)]
        let (col, row) = ((i % 64) as f32, (i / 64) as f32);
        sim.world_mut().add_body(
            e,
            PhysicsBody::new()
                .with_size(1.0, 1.0)
                .with_position(col * 4.0, row * 4.0)
                .with_gravity_applied(false)
                .with_process_collisions(collisions),
        );
    }
    sim
}

/// Integration only: intent handling, drag, gravity, no pair tests.
fn bench_integration_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("integration_pass");

    for count in [64usize, 512, 4096] {
        let mut sim = sparse_world(count, false);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(sim.advance(SUBSTEP)));
        });
    }

    group.finish();
}

/// Full tick including the pairwise collision phase on a sparse world
/// (every pair tested, none colliding).
fn bench_pairwise_phase(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairwise_phase");
    group.sample_size(20);

    for count in [16usize, 64, 256] {
        let mut sim = sparse_world(count, true);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(sim.advance(SUBSTEP)));
        });
    }

    group.finish();
}

/// The stock arena: four bodies with live resting contact.
fn bench_demo_level_tick(c: &mut Criterion) {
    let mut sim = Simulation::new(SimConfig::default());
    sim.spawn_demo_level();
    // Settle onto the floor first so the benchmark measures steady
    // state, not the initial fall.
    for _ in 0..300 {
        sim.advance(SUBSTEP);
    }

    c.bench_function("demo_level_steady_state", |b| {
        b.iter(|| black_box(sim.advance(SUBSTEP)));
    });
}

criterion_group!(
    benches,
    bench_integration_pass,
    bench_pairwise_phase,
    bench_demo_level_tick
);
criterion_main!(benches);
