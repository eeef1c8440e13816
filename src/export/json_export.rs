//! JSON lattice snapshot export.
//!
//! Serializes the read-only view visualization consumers work from: one row
//! per compartment with its position, concentrations, and aggregate mass.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::state::{Biofilm, SimulationMetrics};

/// One compartment row in the snapshot
#[derive(Debug, Clone, Serialize)]
pub struct VortexRecord {
    pub x: usize,
    pub y: usize,
    pub z: usize,
    /// Substrate concentration (g/l)
    pub conc_subst: f64,
    /// QSM concentration (g/l)
    pub conc_qsm: f64,
    /// QSI concentration (g/l)
    pub conc_qsi: f64,
    /// Total particle mass (fg)
    pub total_mass_fg: f64,
    /// Particle count
    pub particles: usize,
}

/// Full lattice export structure
#[derive(Debug, Clone, Serialize)]
pub struct LatticeExport {
    /// Export timestamp
    pub exported_at: String,
    /// Export version for compatibility
    pub version: &'static str,
    /// Lattice-wide metrics snapshot
    pub metrics: SimulationMetrics,
    /// Per-compartment rows in flattened-index order
    pub vortices: Vec<VortexRecord>,
}

impl LatticeExport {
    /// Build the export structure from a lattice snapshot
    pub fn from_biofilm(biofilm: &Biofilm) -> Self {
        let vortices = biofilm
            .vortices()
            .iter()
            .map(|vortex| {
                let (x, y, z) = vortex.position();
                VortexRecord {
                    x,
                    y,
                    z,
                    conc_subst: vortex.conc_subst(),
                    conc_qsm: vortex.conc_qsm(),
                    conc_qsi: vortex.conc_qsi(),
                    total_mass_fg: vortex.total_mass_fg(),
                    particles: vortex.particle_count(),
                }
            })
            .collect();

        Self {
            exported_at: Local::now().to_rfc3339(),
            version: "1.0.0",
            metrics: SimulationMetrics::collect(biofilm),
            vortices,
        }
    }
}

/// Export the current lattice state to a timestamped JSON file
///
/// Creates the exports directory if it doesn't exist. Returns the path to
/// the saved file.
pub fn export_lattice_json(biofilm: &Biofilm) -> Result<PathBuf> {
    let dir = PathBuf::from("exports");
    std::fs::create_dir_all(&dir)?;

    let filename = format!("lattice_{}.json", Local::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(&filename);
    export_lattice_json_to(biofilm, &path)?;
    Ok(path)
}

/// Export the current lattice state to a specific file
pub fn export_lattice_json_to<P: AsRef<Path>>(biofilm: &Biofilm, path: P) -> Result<()> {
    let export = LatticeExport::from_biofilm(biofilm);
    let file = std::fs::File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &export)?;

    log::info!("Lattice snapshot exported: {}", path.as_ref().display());
    Ok(())
}
