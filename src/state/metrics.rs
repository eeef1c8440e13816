//! Aggregated simulation metrics for reporting and export.
//!
//! A read-only snapshot of lattice-wide quantities, collected once per
//! sample from the compartment store. External consumers (progress output,
//! CSV/JSON export) work from this struct and never touch live state.

use serde::{Deserialize, Serialize};

use crate::state::biofilm::Biofilm;
use crate::state::particle::Particle;

/// Lattice-wide snapshot of one simulation instant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Completed steps
    pub step: u64,
    /// Elapsed simulated time (minutes)
    pub time_min: f64,
    /// Total cell aggregate mass (fg)
    pub total_cell_mass_fg: f64,
    /// Total EPS mass, emitted particles plus accumulators (fg)
    pub total_eps_mass_fg: f64,
    /// Particles across the lattice
    pub particle_count: usize,
    /// Cell aggregates across the lattice
    pub cell_particle_count: usize,
    /// EPS aggregates across the lattice
    pub eps_particle_count: usize,
    /// Down-regulated cells across the lattice
    pub num_down: u64,
    /// Up-regulated cells across the lattice
    pub num_up: u64,
    /// Mean substrate concentration (g/l)
    pub mean_conc_subst: f64,
    /// Maximum substrate concentration (g/l)
    pub max_conc_subst: f64,
    /// Mean QSM concentration (g/l)
    pub mean_conc_qsm: f64,
    /// Maximum QSM concentration (g/l)
    pub max_conc_qsm: f64,
    /// Mean QSI concentration (g/l)
    pub mean_conc_qsi: f64,
    /// Maximum QSI concentration (g/l)
    pub max_conc_qsi: f64,
}

impl SimulationMetrics {
    /// Collect a snapshot from the lattice
    pub fn collect(biofilm: &Biofilm) -> Self {
        let mut total_cell_mass = 0.0;
        let mut total_eps_mass = 0.0;
        let mut cell_particles = 0;
        let mut eps_particles = 0;
        let mut num_down = 0u64;
        let mut num_up = 0u64;
        let mut sum_subst = 0.0;
        let mut max_subst = 0.0f64;
        let mut sum_qsm = 0.0;
        let mut max_qsm = 0.0f64;
        let mut sum_qsi = 0.0;
        let mut max_qsi = 0.0f64;

        for vortex in biofilm.vortices() {
            for particle in vortex.particles() {
                match particle {
                    Particle::Cell(cell) => {
                        total_cell_mass += cell.mass_fg;
                        cell_particles += 1;
                        num_down += u64::from(cell.num_down);
                        num_up += u64::from(cell.num_up);
                    }
                    Particle::Eps(eps) => {
                        total_eps_mass += eps.mass_fg;
                        eps_particles += 1;
                    }
                }
            }
            total_eps_mass += vortex.eps_amount_fg();
            sum_subst += vortex.conc_subst();
            max_subst = max_subst.max(vortex.conc_subst());
            sum_qsm += vortex.conc_qsm();
            max_qsm = max_qsm.max(vortex.conc_qsm());
            sum_qsi += vortex.conc_qsi();
            max_qsi = max_qsi.max(vortex.conc_qsi());
        }

        let n = biofilm.vortices().len().max(1) as f64;
        Self {
            step: biofilm.time_step(),
            time_min: biofilm.time_min(),
            total_cell_mass_fg: total_cell_mass,
            total_eps_mass_fg: total_eps_mass,
            particle_count: cell_particles + eps_particles,
            cell_particle_count: cell_particles,
            eps_particle_count: eps_particles,
            num_down,
            num_up,
            mean_conc_subst: sum_subst / n,
            max_conc_subst: max_subst,
            mean_conc_qsm: sum_qsm / n,
            max_conc_qsm: max_qsm,
            mean_conc_qsi: sum_qsi / n,
            max_conc_qsi: max_qsi,
        }
    }
}
