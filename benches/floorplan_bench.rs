//! Criterion benchmarks for u-floorplan.
//!
//! Synthetic apartments of increasing room count on a rectangular boundary,
//! measuring each phase separately.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_floorplan::discrete::{DiscreteConfig, DiscreteRunner};
use u_floorplan::evolve::squish::apply_squish_collisions;
use u_floorplan::evolve::{EvolveConfig, FloorplanSolver, RoomState};
use u_floorplan::geometry::{Boundary, Point, Rect};
use u_floorplan::problem::{Adjacency, AspectBound, FloorplanProblem, RoomRequest};

// ===========================================================================
// Synthetic problems
// ===========================================================================

fn boundary(rooms: usize) -> Vec<Point> {
    let side = (rooms as f64 * 40.0).sqrt().ceil() + 4.0;
    Rect::new(0.0, 0.0, side, side).corners().to_vec()
}

fn requests(rooms: usize) -> Vec<RoomRequest> {
    (0..rooms)
        .map(|i| RoomRequest::new(format!("r{i}"), 16.0 + (i % 4) as f64 * 6.0))
        .collect()
}

/// A chain plus a hub: every room touches its successor and room 0.
fn adjacencies(rooms: usize) -> Vec<Adjacency> {
    (1..rooms)
        .flat_map(|i| {
            let chain = Adjacency::new(format!("r{}", i - 1), format!("r{i}"));
            let hub = Adjacency::new("r0", format!("r{i}")).with_weight(0.5);
            if i == 1 {
                vec![chain]
            } else {
                vec![chain, hub]
            }
        })
        .collect()
}

fn problem(rooms: usize) -> FloorplanProblem {
    FloorplanProblem::new(boundary(rooms), requests(rooms), adjacencies(rooms))
        .expect("synthetic problem is valid")
}

/// Rooms stacked around the middle so most pairs overlap.
fn crowded_rooms(rooms: usize) -> Vec<RoomState> {
    (0..rooms)
        .map(|i| {
            let offset = (i % 5) as f64 * 2.0;
            RoomState::new(
                format!("r{i}"),
                Rect::new(10.0 + offset, 10.0 + offset, 5.0, 4.0),
                20.0,
                AspectBound::target(2.5),
            )
        })
        .collect()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_discrete(c: &mut Criterion) {
    let mut group = c.benchmark_group("discrete");
    group.sample_size(10);

    for &n in &[4usize, 8, 16] {
        let config = DiscreteConfig::default()
            .with_max_iterations(100)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(problem(n), config),
            |b, (p, c)| {
                b.iter(|| {
                    let result = DiscreteRunner::run(black_box(p), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_squish(c: &mut Criterion) {
    let mut group = c.benchmark_group("squish");
    let outline = Boundary::rectangle(60.0, 60.0).expect("valid boundary");

    for &n in &[8usize, 16, 32] {
        let rooms = crowded_rooms(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &rooms, |b, rooms| {
            b.iter(|| {
                let mut work = rooms.clone();
                let report = apply_squish_collisions(black_box(&mut work), &outline, 3, 0.05);
                black_box(report)
            })
        });
    }
    group.finish();
}

fn bench_evolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolve");
    group.sample_size(10);

    for &n in &[4usize, 8, 16] {
        let p = problem(n);
        let config = EvolveConfig::fast().with_max_generations(20).with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("r{n}_g20"), n),
            &(p, config),
            |b, (p, c)| {
                b.iter(|| {
                    let rooms = p
                        .rooms()
                        .iter()
                        .map(|r| RoomState::from_request(r, p.boundary().centroid()))
                        .collect();
                    let mut solver = FloorplanSolver::from_problem(p, rooms, c.clone())
                        .expect("valid solver input");
                    solver.simulate(20);
                    black_box(solver.best_fitness())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_discrete, bench_squish, bench_evolve);
criterion_main!(benches);
