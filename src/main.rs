//! Biofilm Simulator - Entry point
//!
//! Quorum-sensing biofilm growth simulation on a 3D compartment lattice.
//!
//! CLI Usage:
//!   cargo run --release                   # Run with default parameters
//!   cargo run --release -- -n 10000       # Custom step count
//!   cargo run --release -- --seed 7       # Custom RNG seed
//!   cargo run --release -- --csv 100      # CSV export every 100 steps

use anyhow::Result;
use biofilm_simulator::{
    export::{export_lattice_json, CsvExporter},
    simulation::{Simulation, SimulationConfig},
    Parameters,
};

struct CliArgs {
    n_steps: u64,
    rng_seed: u64,
    csv_interval: Option<u64>,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = CliArgs {
        n_steps: 1000,
        rng_seed: 42,
        csv_interval: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-n" | "--steps" => {
                let value = iter.next().ok_or_else(|| anyhow::anyhow!("-n needs a value"))?;
                args.n_steps = value.parse()?;
            }
            "--seed" => {
                let value = iter.next().ok_or_else(|| anyhow::anyhow!("--seed needs a value"))?;
                args.rng_seed = value.parse()?;
            }
            "--csv" => {
                let value = iter.next().ok_or_else(|| anyhow::anyhow!("--csv needs a value"))?;
                args.csv_interval = Some(value.parse()?);
            }
            other => anyhow::bail!("Unknown argument: {}", other),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let params = Parameters::load_or_default();
    let (nx, ny, nz) = params.lattice.dimensions();
    println!("=== Biofilm Simulator ===");
    println!("Lattice: {}x{}x{} compartments", nx, ny, nz);
    println!(
        "Timestep: {:.4} min, capacity: {:.1} particles/compartment",
        params.dt_min,
        params.max_particles_per_vortex()
    );

    let config = SimulationConfig {
        n_steps: args.n_steps,
        rng_seed: args.rng_seed,
        ..SimulationConfig::default()
    };

    let mut sim = Simulation::new(params, config);
    let mut exporter = match args.csv_interval {
        Some(interval) => Some(CsvExporter::new(interval)?),
        None => None,
    };

    let metrics = sim.run_with(|metrics| {
        if let Some(exporter) = exporter.as_mut() {
            exporter.maybe_record(metrics)?;
        }
        Ok::<(), anyhow::Error>(())
    })?;
    println!(
        "Done: {:.2} min simulated, {:.1} fg cell mass, {:.1} fg EPS, {} particles",
        metrics.time_min, metrics.total_cell_mass_fg, metrics.total_eps_mass_fg,
        metrics.particle_count
    );
    println!(
        "Regulation: {} down, {} up; mean substrate {:.4} g/l",
        metrics.num_down, metrics.num_up, metrics.mean_conc_subst
    );

    if let Some(exporter) = exporter {
        exporter.finish()?;
    }
    let snapshot = export_lattice_json(sim.biofilm())?;
    println!("Lattice snapshot: {}", snapshot.display());

    Ok(())
}
