//! Kinetics module: time derivatives and rate laws for the biofilm model.
//!
//! This module collects the pure rate functions the stepping engine is built
//! on:
//! - Finite-difference diffusion with a local production term
//! - Monod substrate uptake and yield-limited cell growth
//! - Stochastic down-/up-regulation switching probabilities
//! - EPS production from regulated sub-populations
//!
//! References:
//! - Fozard JA et al. BioSystems. 2012;109:105-114 (model equations)
//! - Monod J. Annu Rev Microbiol. 1949;3:371-394 (uptake kinetics)

mod reaction_diffusion;
mod regulation;

pub use reaction_diffusion::{cell_mass_derivative, concentration_derivative, monod_uptake_rate};
pub use regulation::{eps_production_rate, probability_down2up, probability_up2down};
