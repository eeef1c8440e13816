//! Quorum-sensing regulation kinetics.
//!
//! Cells inside an aggregate are either down-regulated (baseline EPS output)
//! or up-regulated (high EPS output). Switching between the two states is
//! stochastic, with rates modulated by the local QSM and QSI concentrations:
//! QSM drives up-regulation, QSI suppresses it.
//!
//! Reference: Fozard JA et al. BioSystems. 2012;109:105-114, eqs. (9)-(10)

use crate::config::RegulationParameters;
use crate::state::CellAggregate;

/// Rate at which a down-regulated cell switches up (1/min).
///
/// `Q⁺ = α·qsm / (1 + γ(qsm + qsi))`
pub fn probability_down2up(conc_qsm: f64, conc_qsi: f64, reg: &RegulationParameters) -> f64 {
    reg.alpha * conc_qsm / (1.0 + reg.gamma * (conc_qsm + conc_qsi))
}

/// Rate at which an up-regulated cell switches down (1/min).
///
/// `Q⁻ = β(1 + γ·qsi) / (1 + γ(qsm + qsi))`
pub fn probability_up2down(conc_qsm: f64, conc_qsi: f64, reg: &RegulationParameters) -> f64 {
    reg.beta * (1.0 + reg.gamma * conc_qsi) / (1.0 + reg.gamma * (conc_qsm + conc_qsi))
}

/// Total EPS production rate of a compartment's cell aggregates (fg/min).
///
/// `dE/dt = Σ (Zd·down + Zu·up)`
pub fn eps_production_rate<'a, I>(cells: I, reg: &RegulationParameters) -> f64
where
    I: IntoIterator<Item = &'a CellAggregate>,
{
    cells
        .into_iter()
        .map(|cell| {
            reg.eps_rate_down_Zd * f64::from(cell.num_down)
                + reg.eps_rate_up_Zu * f64::from(cell.num_up)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_qsm_no_upregulation() {
        let reg = RegulationParameters::default();
        assert_eq!(probability_down2up(0.0, 0.0, &reg), 0.0);
        assert_eq!(probability_down2up(0.0, 5.0, &reg), 0.0);
    }

    #[test]
    fn test_qsi_suppresses_upregulation() {
        let reg = RegulationParameters::default();
        let without_qsi = probability_down2up(1.0, 0.0, &reg);
        let with_qsi = probability_down2up(1.0, 10.0, &reg);
        assert!(
            with_qsi < without_qsi,
            "QSI should lower the up-switch rate: {} vs {}",
            with_qsi,
            without_qsi
        );
    }

    #[test]
    fn test_qsi_promotes_downregulation() {
        let reg = RegulationParameters::default();
        let without_qsi = probability_up2down(1.0, 0.0, &reg);
        let with_qsi = probability_up2down(1.0, 10.0, &reg);
        assert!(with_qsi > without_qsi);
    }

    #[test]
    fn test_baseline_downregulation_rate() {
        let reg = RegulationParameters::default();
        // No signals: Q⁻ = β
        assert!((probability_up2down(0.0, 0.0, &reg) - reg.beta).abs() < 1e-12);
    }

    #[test]
    fn test_eps_production_sums_over_aggregates() {
        let reg = RegulationParameters::default();
        let mut a = CellAggregate::new(410.0, 410.0);
        let mut b = CellAggregate::new(820.0, 410.0);
        a.num_down = 2;
        a.num_up = 1;
        b.num_down = 0;
        b.num_up = 3;

        let rate = eps_production_rate([&a, &b], &reg);
        let expected = reg.eps_rate_down_Zd * 2.0 + reg.eps_rate_up_Zu * 4.0;
        assert!(
            (rate - expected).abs() < 1e-15,
            "EPS rate should be {}, got {}",
            expected,
            rate
        );
    }

    #[test]
    fn test_eps_production_empty() {
        let reg = RegulationParameters::default();
        let no_cells: [&CellAggregate; 0] = [];
        assert_eq!(eps_production_rate(no_cells, &reg), 0.0);
    }
}
