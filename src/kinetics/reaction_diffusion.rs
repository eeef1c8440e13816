//! Reaction-diffusion derivatives for compartment concentrations and cell mass.
//!
//! Concentrations live at compartment centres; diffusion is the standard
//! finite-difference Laplacian over the (up to six) face neighbours. A
//! missing neighbour at the domain wall is simply absent from the sum, which
//! makes the wall zero-flux by omission rather than by reflection.

use crate::config::KineticsParameters;

/// Time derivative of a compartment concentration (g/l/min).
///
/// `dc/dt = D/l² · (Σ c_neigh − n·c) + production/l³`
///
/// * `conc` - concentration in this compartment (g/l)
/// * `neighbor_concs` - concentrations of the present face neighbours
/// * `diffusion` - diffusion coefficient (μm²/min)
/// * `production` - local production (negative for uptake) (fg/min)
/// * `vortex_length_um` - compartment edge length (μm)
pub fn concentration_derivative(
    conc: f64,
    neighbor_concs: &[f64],
    diffusion: f64,
    production: f64,
    vortex_length_um: f64,
) -> f64 {
    let l2 = vortex_length_um * vortex_length_um;
    let l3 = l2 * vortex_length_um;
    let n = neighbor_concs.len() as f64;
    let neighbor_sum: f64 = neighbor_concs.iter().sum();

    diffusion / l2 * (neighbor_sum - n * conc) + production / l3
}

/// Time derivative of cell aggregate mass (fg/min).
///
/// `dM/dt = Y · (v − m·M)` — growth is yield-limited uptake minus
/// maintenance.
pub fn cell_mass_derivative(mass_fg: f64, uptake_rate: f64, kinetics: &KineticsParameters) -> f64 {
    kinetics.max_yield * (uptake_rate - kinetics.maintenance_rate * mass_fg)
}

/// Monod substrate uptake rate of a cell aggregate (fg/min).
///
/// `v = Vmax · S/(Ks + S) · M`
pub fn monod_uptake_rate(conc_subst: f64, mass_fg: f64, kinetics: &KineticsParameters) -> f64 {
    kinetics.max_uptake_rate_Vmax * conc_subst / (kinetics.half_saturation_Ks + conc_subst)
        * mass_fg
}
