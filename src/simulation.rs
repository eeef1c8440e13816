//! Simulation driver: seeding, boundary conditions, and the run loop.
//!
//! Wraps the lattice with the experiment scaffolding: initial colonization of
//! the substratum, the bulk-liquid boundary at the top of the domain, and a
//! fixed-step run loop with coarse progress reporting.

use std::convert::Infallible;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Parameters;
use crate::state::{Biofilm, CellAggregate, Particle, SimulationMetrics};

/// Run configuration for one simulation experiment
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of timesteps to run
    pub n_steps: u64,
    /// RNG seed; a fixed seed reproduces a run bit-for-bit
    pub rng_seed: u64,
    /// Cell aggregates seeded into every substratum (z = 0) compartment
    pub seed_particles_per_vortex: usize,
    /// Lower bound of the seeded aggregate mass (fg)
    pub seed_mass_min_fg: f64,
    /// Upper bound of the seeded aggregate mass (fg)
    pub seed_mass_max_fg: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_steps: 1000,
            rng_seed: 42,
            seed_particles_per_vortex: 10,
            seed_mass_min_fg: 400.0,
            seed_mass_max_fg: 800.0,
        }
    }
}

/// A seeded biofilm experiment ready to run
pub struct Simulation {
    biofilm: Biofilm,
    config: SimulationConfig,
}

impl Simulation {
    /// Build the lattice and apply the initial conditions
    ///
    /// Every compartment starts at bulk substrate concentration with no QSM
    /// or QSI; substratum compartments receive the initial cell aggregates
    /// with uniformly random masses.
    pub fn new(params: Parameters, config: SimulationConfig) -> Self {
        let bulk = params.bulk_concentration;
        let avg_mass = params.cell.avg_mass_fg;
        let capacity = params.max_particles_per_vortex();
        let mass_span = config.seed_mass_max_fg - config.seed_mass_min_fg;

        let mut biofilm = Biofilm::new(params, config.rng_seed);
        // Separate stream so seeding draws don't shift the sweep's RNG state
        let mut seed_rng = StdRng::seed_from_u64(config.rng_seed.wrapping_add(1));

        for vortex in biofilm.vortices_mut() {
            vortex.pin_substrate(bulk);
            if vortex.position().2 == 0 {
                for _ in 0..config.seed_particles_per_vortex {
                    let mass = config.seed_mass_min_fg + mass_span * seed_rng.gen::<f64>();
                    vortex.add_particle(
                        Particle::Cell(CellAggregate::new(mass, avg_mass)),
                        capacity,
                    );
                }
            }
        }

        Self { biofilm, config }
    }

    /// The underlying lattice (read-only snapshot access)
    pub fn biofilm(&self) -> &Biofilm {
        &self.biofilm
    }

    /// Current lattice-wide metrics
    pub fn metrics(&self) -> SimulationMetrics {
        SimulationMetrics::collect(&self.biofilm)
    }

    /// Advance one timestep: boundary hook first, then the lattice sweep
    pub fn step(&mut self) {
        self.apply_bulk_boundary();
        self.biofilm.step();
    }

    /// Pin the top layer (z = nz−1) to bulk conditions
    ///
    /// The top of the domain touches the bulk liquid: substrate is held at
    /// the bulk concentration (both buffers, so the commit cannot erase it)
    /// and any particles pushed up there are washed out.
    fn apply_bulk_boundary(&mut self) {
        let bulk = self.biofilm.params().bulk_concentration;
        let (_, _, nz) = self.biofilm.dimensions();
        let top = nz - 1;
        for vortex in self.biofilm.vortices_mut() {
            if vortex.position().2 == top {
                vortex.pin_substrate(bulk);
                vortex.clear_particles();
            }
        }
    }

    /// Run the configured number of steps, reporting progress at 5% marks
    pub fn run(&mut self) -> SimulationMetrics {
        let result: Result<SimulationMetrics, Infallible> = self.run_with(|_| Ok(()));
        match result {
            Ok(metrics) => metrics,
            Err(never) => match never {},
        }
    }

    /// Run with a per-step observer (sampling, export hooks)
    ///
    /// The observer sees the post-step metrics snapshot; its first error
    /// aborts the run.
    pub fn run_with<E, F>(&mut self, mut observer: F) -> Result<SimulationMetrics, E>
    where
        F: FnMut(&SimulationMetrics) -> Result<(), E>,
    {
        let n = self.config.n_steps;
        let mut next_report = 0u64;
        for i in 0..n {
            if n >= 20 && i == next_report {
                log::info!("Simulation progress: {}%", i * 100 / n);
                next_report += n / 20;
            }
            self.step();
            observer(&self.metrics())?;
        }
        log::info!(
            "Simulation complete: {} steps, {:.2} min simulated",
            n,
            self.biofilm.time_min()
        );
        Ok(self.metrics())
    }
}
