//! Biofilm Simulator - quorum-sensing biofilm growth on a 3D lattice
//!
//! Simulates bacterial biofilm development in a box of cubic compartments:
//! cell aggregates grow on a diffusing substrate, divide, and switch between
//! down- and up-regulated states under quorum-sensing molecule (QSM) and
//! inhibitor (QSI) control; up-regulated cells secrete EPS, and crowded
//! compartments push particles toward lower-pressure neighbours.
//!
//! Model: Fozard JA et al. BioSystems. 2012;109:105-114

// Allow non-snake-case for symbol suffixes in field names (Ks, Vmax, Kq, ...)
// This follows the project convention of naming model constants as published.
#![allow(non_snake_case)]

pub mod config;
pub mod export;
pub mod kinetics;
pub mod simulation;
pub mod state;

pub use config::{
    CellParameters, KineticsParameters, LatticeParameters, Parameters, RegulationParameters,
    TransportParameters,
};
pub use export::{export_lattice_json, CsvExporter, LatticeExport, TimeSeriesRecord};
pub use kinetics::{
    cell_mass_derivative, concentration_derivative, eps_production_rate, monod_uptake_rate,
    probability_down2up, probability_up2down,
};
pub use simulation::{Simulation, SimulationConfig};
pub use state::{
    compartment_pressure, Biofilm, CellAggregate, EpsAggregate, Particle, SimulationMetrics,
    Vortex, PRESSURE_CLAMP,
};
