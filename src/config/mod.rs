//! Configuration module for loading simulation parameters.
//!
//! All model parameters include citations to their source publication.

mod parameters;

pub use parameters::{
    CellParameters, KineticsParameters, LatticeParameters, Parameters, RegulationParameters,
    TransportParameters,
};
