//! # Swing Simulation Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use swing_lib::{
    params::SimParams,
    swing::{Simulator, SwingParams},
};

fn simulate_benchmark(c: &mut Criterion) {
    let sim = Simulator::new(SimParams::default());

    // Default swing, which hits the ball
    let hit = SwingParams::default();

    // Early wrist hold, which sits on the lag limit and misses
    let held = SwingParams {
        t2_delay_s: 0.0,
        t2_mag_nm: -50.0,
        t2_dur_s: 0.3,
        ..Default::default()
    };

    c.bench_function("Simulator::simulate::hit", |b| {
        b.iter(|| sim.simulate(black_box(&hit)))
    });

    c.bench_function("Simulator::simulate::held", |b| {
        b.iter(|| sim.simulate(black_box(&held)))
    });

    let flight = sim.flight_model();

    c.bench_function("FlightModel::flight", |b| {
        b.iter(|| flight.flight(black_box(30.9), black_box(3.4), black_box(26.7)))
    });
}

criterion_group!(benches, simulate_benchmark);
criterion_main!(benches);
