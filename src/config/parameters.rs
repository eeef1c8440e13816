//! Parameter structures with citation metadata.
//!
//! All model parameters carry their source: Fozard et al., "Inhibition of
//! quorum sensing in a computational biofilm simulation", BioSystems 109
//! (2012), unless noted otherwise. Units live in field names (fg = femtogram,
//! um = micrometre, min = minute).

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level parameters container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters {
    /// Lattice geometry (domain size, compartment edge length)
    pub lattice: LatticeParameters,
    /// Cell aggregate parameters (masses, densities, packing)
    pub cell: CellParameters,
    /// Substrate uptake and growth kinetics
    pub kinetics: KineticsParameters,
    /// Quorum-sensing regulation and EPS production
    pub regulation: RegulationParameters,
    /// Diffusion and particle transfer
    pub transport: TransportParameters,
    /// Simulation timestep (minutes)
    /// Reference: Fozard 2012 uses a single timestep of 0.1 s
    pub dt_min: f64,
    /// Bulk substrate concentration at the top boundary (g/l)
    pub bulk_concentration: f64,
}

impl Parameters {
    /// Load parameters from JSON, or use defaults if the file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_or_default_from("data/parameters/biofilm.json")
    }

    /// Load parameters from a specific JSON file
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(params) => {
                    log::info!("Loaded biofilm parameters from {:?}", path.as_ref());
                    params
                }
                Err(e) => {
                    log::warn!("Failed to parse biofilm parameters: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Biofilm parameters file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Maximum number of particles a compartment can hold (shared capacity)
    ///
    /// Derived from the maximum packing fraction: at most `max_volume_fraction`
    /// of the compartment volume may be occupied by aggregates of maximal mass.
    /// Kept fractional; the pressure model divides by `capacity - N`.
    pub fn max_particles_per_vortex(&self) -> f64 {
        let vl = self.lattice.vortex_length_um;
        self.cell.density_fg_per_um3 * self.cell.max_volume_fraction * vl * vl * vl
            / self.cell.max_mass_fg
    }

    /// Mass of an emitted EPS aggregate (fg)
    ///
    /// EPS particles occupy the same volume as a maximal cell aggregate.
    pub fn max_eps_mass_fg(&self) -> f64 {
        self.cell.eps_density_fg_per_um3 / self.cell.density_fg_per_um3 * self.cell.max_mass_fg
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            lattice: LatticeParameters::default(),
            cell: CellParameters::default(),
            kinetics: KineticsParameters::default(),
            regulation: RegulationParameters::default(),
            transport: TransportParameters::default(),
            // 1/600 min = 0.1 s
            dt_min: 1.0 / 600.0,
            bulk_concentration: 0.2,
        }
    }
}

/// Lattice geometry parameters
///
/// The domain is a box subdivided into cubic compartments ("vortices") of
/// edge length `vortex_length_um`. Domain lengths must be whole multiples of
/// the compartment edge length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticeParameters {
    /// Compartment edge length (μm)
    /// Reference: Fozard 2012, table 1
    pub vortex_length_um: f64,
    /// Domain length in x (μm)
    pub length_x_um: f64,
    /// Domain length in y (μm)
    pub length_y_um: f64,
    /// Domain length in z (μm); z = 0 is the substratum
    pub length_z_um: f64,
}

impl LatticeParameters {
    /// Number of compartments along each axis
    pub fn dimensions(&self) -> (usize, usize, usize) {
        let vl = self.vortex_length_um;
        (
            (self.length_x_um / vl) as usize,
            (self.length_y_um / vl) as usize,
            (self.length_z_um / vl) as usize,
        )
    }
}

impl Default for LatticeParameters {
    fn default() -> Self {
        Self {
            vortex_length_um: 17.0,
            length_x_um: 5.0 * 17.0,
            length_y_um: 5.0 * 17.0,
            length_z_um: 10.0 * 17.0,
        }
    }
}

/// Cell aggregate parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellParameters {
    /// Mass at which a cell aggregate divides (fg)
    /// Reference: Fozard 2012, table 1
    pub max_mass_fg: f64,
    /// Average mass of a single cell (fg); ties regulation counts to mass
    pub avg_mass_fg: f64,
    /// Cell aggregate density (fg/μm³)
    pub density_fg_per_um3: f64,
    /// EPS aggregate density (fg/μm³)
    pub eps_density_fg_per_um3: f64,
    /// Maximum volume fraction of a compartment occupied by particles
    /// Reference: random close packing of spheres, Fozard 2012
    pub max_volume_fraction: f64,
}

impl Default for CellParameters {
    fn default() -> Self {
        Self {
            max_mass_fg: 14700.0,
            avg_mass_fg: 410.0,
            density_fg_per_um3: 290.0,
            eps_density_fg_per_um3: 290.0,
            max_volume_fraction: 0.52,
        }
    }
}

/// Substrate uptake and growth kinetics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KineticsParameters {
    /// Monod half-saturation constant Ks (g/l)
    /// Reference: Fozard 2012, table 2
    pub half_saturation_Ks: f64,
    /// Maximum specific substrate uptake rate Vmax (1/min)
    pub max_uptake_rate_Vmax: f64,
    /// Maximum growth yield Y (dimensionless)
    pub max_yield: f64,
    /// Maintenance rate m (1/min); mass decays at Y·m·M without substrate
    pub maintenance_rate: f64,
}

impl Default for KineticsParameters {
    fn default() -> Self {
        Self {
            half_saturation_Ks: 2.34e-3,
            max_uptake_rate_Vmax: 0.046,
            max_yield: 0.444,
            maintenance_rate: 6e-4,
        }
    }
}

/// Quorum-sensing regulation and EPS production parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulationParameters {
    /// Down- to up-regulation rate coefficient α (l/g/min)
    /// Reference: Fozard 2012, table 3
    pub alpha: f64,
    /// Up- to down-regulation rate coefficient β (1/min)
    pub beta: f64,
    /// QSM/QSI saturation coefficient γ (l/g)
    pub gamma: f64,
    /// QSM positive-feedback half-saturation Kq (g/l); 0 disables feedback
    pub qsm_feedback_Kq: f64,
    /// EPS production rate per down-regulated cell Zd (fg/min)
    pub eps_rate_down_Zd: f64,
    /// EPS production rate per up-regulated cell Zu (fg/min)
    pub eps_rate_up_Zu: f64,
}

impl Default for RegulationParameters {
    fn default() -> Self {
        Self {
            alpha: 1.33,
            beta: 10.0,
            gamma: 0.1,
            qsm_feedback_Kq: 0.0,
            eps_rate_down_Zd: 1e-6,
            eps_rate_up_Zu: 1e-3,
        }
    }
}

/// Diffusion and particle transfer parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportParameters {
    /// Substrate diffusion coefficient (μm²/min)
    /// Reference: oxygen in water, Fozard 2012
    pub diffusion_substrate: f64,
    /// QSM diffusion coefficient (μm²/min)
    pub diffusion_qsm: f64,
    /// QSI diffusion coefficient (μm²/min)
    pub diffusion_qsi: f64,
    /// Pressure-driven particle transfer coefficient μ (dimensionless)
    pub transfer_coefficient: f64,
}

impl Default for TransportParameters {
    fn default() -> Self {
        Self {
            diffusion_substrate: 40680.0,
            diffusion_qsm: 33300.0,
            diffusion_qsi: 33300.0,
            transfer_coefficient: 0.1,
        }
    }
}
