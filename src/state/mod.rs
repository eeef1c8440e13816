//! State management for the biofilm simulation.
//!
//! Contains the particle model, the compartment ("vortex") state machine,
//! the lattice that drives the synchronized step, and the metrics snapshot.

mod biofilm;
mod metrics;
mod particle;
mod vortex;

pub use biofilm::Biofilm;
pub use metrics::SimulationMetrics;
pub use particle::{CellAggregate, EpsAggregate, Particle};
pub use vortex::{compartment_pressure, Vortex, PRESSURE_CLAMP};
