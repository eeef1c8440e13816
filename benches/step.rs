//! Timestep benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use biofilm_simulator::config::Parameters;
use biofilm_simulator::simulation::{Simulation, SimulationConfig};
use biofilm_simulator::state::{Biofilm, SimulationMetrics};

fn bench_empty_lattice_step(c: &mut Criterion) {
    let mut biofilm = Biofilm::new(Parameters::default(), 42);

    c.bench_function("empty_lattice_step", |b| {
        b.iter(|| black_box(&mut biofilm).step())
    });
}

fn bench_seeded_simulation_step(c: &mut Criterion) {
    let config = SimulationConfig {
        n_steps: 1, // Stepped manually below
        ..Default::default()
    };
    let mut sim = Simulation::new(Parameters::default(), config);
    // Warm up past the initial transient
    for _ in 0..50 {
        sim.step();
    }

    c.bench_function("seeded_simulation_step", |b| {
        b.iter(|| black_box(&mut sim).step())
    });
}

fn bench_metrics_collection(c: &mut Criterion) {
    let mut sim = Simulation::new(Parameters::default(), SimulationConfig::default());
    for _ in 0..50 {
        sim.step();
    }

    c.bench_function("metrics_collection", |b| {
        b.iter(|| SimulationMetrics::collect(black_box(sim.biofilm())))
    });
}

criterion_group!(
    benches,
    bench_empty_lattice_step,
    bench_seeded_simulation_step,
    bench_metrics_collection
);
criterion_main!(benches);
