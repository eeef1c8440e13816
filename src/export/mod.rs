//! Export functionality for simulation data.
//!
//! Provides CSV time-series export and JSON lattice snapshot export. Both
//! consume read-only metric/lattice snapshots and never mutate simulation
//! state.

mod csv_export;
mod json_export;

pub use csv_export::{CsvExporter, TimeSeriesRecord};
pub use json_export::{export_lattice_json, LatticeExport, VortexRecord};
