//! End-to-end scenario tests for the full simulation loop.
//!
//! Covered behavior:
//! - Single-aggregate, zero-substrate step matches the growth model exactly
//! - Fixed seeds reproduce whole runs bit-for-bit
//! - The bulk boundary pins the top layer every step
//! - Lattice-wide bookkeeping stays consistent over longer runs

use biofilm_simulator::{
    Biofilm, CellAggregate, LatticeParameters, Parameters, Particle, Simulation, SimulationConfig,
    SimulationMetrics,
};

fn plate_params() -> Parameters {
    // Single-layer 5x5 plate of compartments with edge length 17 μm
    Parameters {
        lattice: LatticeParameters {
            vortex_length_um: 17.0,
            length_x_um: 85.0,
            length_y_um: 85.0,
            length_z_um: 17.0,
        },
        ..Parameters::default()
    }
}

// ============================================================================
// Single-Aggregate Scenario
// ============================================================================

#[test]
fn test_single_aggregate_zero_substrate_step() {
    let params = plate_params();
    let capacity = params.max_particles_per_vortex();
    let avg_mass = params.cell.avg_mass_fg;
    let dt = params.dt_min;
    let kinetics = params.kinetics.clone();

    let mut biofilm = Biofilm::new(params, 9);
    biofilm.vortices_mut()[0].add_particle(
        Particle::Cell(CellAggregate::new(410.0, avg_mass)),
        capacity,
    );

    biofilm.step();

    let vortex = biofilm.vortex_at(0, 0, 0).unwrap();
    assert_eq!(vortex.particle_count(), 1, "Nothing may divide or migrate");

    let cell = vortex.particles()[0].as_cell().expect("Seeded a cell aggregate");
    // No substrate: uptake is zero and only maintenance acts
    let expected = 410.0 + dt * kinetics.max_yield * (0.0 - kinetics.maintenance_rate * 410.0);
    println!("Mass after one starved step: {} (expected {})", cell.mass_fg, expected);
    assert!(
        (cell.mass_fg - expected).abs() < 1e-12,
        "Mass must follow the Euler step exactly: {} vs {}",
        cell.mass_fg,
        expected
    );
    assert!(cell.mass_fg < 410.0, "Maintenance must strictly shrink the mass");
    assert_eq!(cell.num_down, 1, "Count stays in the tolerance band");
    assert_eq!(cell.num_up, 0);

    // Concentrations started at zero and have no source
    assert_eq!(vortex.conc_subst(), 0.0);
    assert_eq!(vortex.conc_qsm(), 0.0);
    assert_eq!(vortex.conc_qsi(), 0.0);
}

// ============================================================================
// Reproducibility
// ============================================================================

#[test]
fn test_fixed_seed_reproduces_run() {
    let config = SimulationConfig {
        n_steps: 50,
        rng_seed: 1234,
        ..SimulationConfig::default()
    };

    let run = |config: SimulationConfig| -> SimulationMetrics {
        let mut sim = Simulation::new(Parameters::default(), config);
        for _ in 0..50 {
            sim.step();
        }
        sim.metrics()
    };

    let a = run(config.clone());
    let b = run(config);

    assert_eq!(a.total_cell_mass_fg.to_bits(), b.total_cell_mass_fg.to_bits());
    assert_eq!(a.particle_count, b.particle_count);
    assert_eq!(a.num_down, b.num_down);
    assert_eq!(a.num_up, b.num_up);
    assert_eq!(a.mean_conc_subst.to_bits(), b.mean_conc_subst.to_bits());
}

#[test]
fn test_different_seeds_diverge() {
    let run = |seed: u64| {
        let config = SimulationConfig {
            n_steps: 10,
            rng_seed: seed,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::new(Parameters::default(), config);
        for _ in 0..10 {
            sim.step();
        }
        sim.metrics().total_cell_mass_fg
    };

    // Seed masses are drawn from the seeded stream, so different seeds give
    // different initial colonies
    assert_ne!(run(1).to_bits(), run(2).to_bits());
}

// ============================================================================
// Boundary and Run-Loop Behavior
// ============================================================================

#[test]
fn test_bulk_layer_pinned_every_step() {
    let mut sim = Simulation::new(Parameters::default(), SimulationConfig::default());
    let (_, _, nz) = sim.biofilm().dimensions();
    let bulk = sim.biofilm().params().bulk_concentration;

    for _ in 0..5 {
        sim.step();
        for vortex in sim.biofilm().vortices() {
            if vortex.position().2 == nz - 1 {
                assert_eq!(vortex.particle_count(), 0, "Top layer is washed out");
            }
        }
    }
    // The hook pins the pending buffer too, so after the in-step commit the
    // top layer still reads at bulk level when the next step begins
    let mut sim2 = Simulation::new(Parameters::default(), SimulationConfig::default());
    sim2.step();
    for vortex in sim2.biofilm().vortices() {
        if vortex.position().2 == nz - 1 {
            // Diffusion may pull it slightly below bulk within the step
            assert!(
                vortex.conc_subst() <= bulk + 1e-12,
                "Top layer substrate {} should start from bulk {}",
                vortex.conc_subst(),
                bulk
            );
        }
    }
}

#[test]
fn test_run_executes_configured_steps() {
    let config = SimulationConfig {
        n_steps: 30,
        rng_seed: 8,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(plate_params(), config);
    let metrics = sim.run();

    assert_eq!(sim.biofilm().time_step(), 30);
    assert_eq!(metrics.step, 30);
    assert!((metrics.time_min - 30.0 / 600.0).abs() < 1e-12);
}

// ============================================================================
// Longer-Run Consistency
// ============================================================================

#[test]
fn test_lattice_bookkeeping_over_long_run() {
    let config = SimulationConfig {
        n_steps: 300,
        rng_seed: 77,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(Parameters::default(), config);
    let initial = sim.metrics();

    for _ in 0..300 {
        sim.step();
    }
    let metrics = sim.metrics();
    println!(
        "After 300 steps: {} particles, {:.1} fg cell mass, mean substrate {:.4}",
        metrics.particle_count, metrics.total_cell_mass_fg, metrics.mean_conc_subst
    );

    // Substratum colony persists (nothing reaches the washed-out top layer
    // this quickly) and counts remain self-consistent
    assert_eq!(metrics.particle_count, initial.particle_count);
    assert!(metrics.total_cell_mass_fg > 0.0);
    assert!(metrics.num_down > 0);

    for vortex in sim.biofilm().vortices() {
        assert!(vortex.conc_subst().is_finite());
        assert!(
            vortex.conc_subst() >= -1e-9,
            "Substrate should not be driven negative at {:?}: {}",
            vortex.position(),
            vortex.conc_subst()
        );
        let (down, up) = vortex.regulation_counts();
        let cell_mass = vortex.cell_mass_fg();
        if cell_mass > 0.0 {
            assert!(down + up > 0, "Cells must be counted where mass exists");
        }
    }
}
