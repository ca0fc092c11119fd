//! # Lookup Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::f64::consts::FRAC_PI_2;

use pathfinder::{Moment, Params, RobotSpecs, Trajectory, TrajectoryParams, Waypoint};

fn lookup_benchmark(c: &mut Criterion) {
    // ---- Build a dummy trajectory ----

    let waypoints = vec![
        Waypoint::new(0.0, 0.0, 0.0),
        Waypoint::new(4.0, 2.0, FRAC_PI_2),
        Waypoint::new(6.0, 6.0, 0.0),
        Waypoint::new(10.0, 5.0, -0.5),
    ];
    let params = TrajectoryParams::new(waypoints, 4.0);

    // Constant velocity profile, the length is only needed to space out the moments
    let length = pathfinder::Path::new(params.waypoints.clone(), params.alpha)
        .unwrap()
        .total_length();
    let num_moments = 1000;
    let moments = (0..num_moments)
        .map(|i| {
            let f = i as f64 / (num_moments - 1) as f64;
            Moment::new(f * length, 1.0, 0.0, 0.0, f * length)
        })
        .collect();

    let traj = Trajectory::from_params(
        RobotSpecs::new(1.0, 1.0),
        params,
        moments,
        Params::default(),
    )
    .unwrap();

    // ---- Benchmarks ----

    c.bench_function("Trajectory::get", |b| {
        b.iter(|| traj.get(black_box(0.37 * length)))
    });

    let path = traj.path();
    c.bench_function("Path::s2t", |b| {
        b.iter(|| path.s2t(black_box(0.37 * length)))
    });

    let mut path = (**path).clone();
    c.bench_function("Path::compute_len", |b| {
        b.iter(|| path.compute_len(black_box(100)))
    });
}

criterion_group!(benches, lookup_benchmark);
criterion_main!(benches);
