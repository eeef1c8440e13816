//! Particle state: cell aggregates and EPS aggregates.
//!
//! A compartment holds a flat collection of particles of two kinds. Cell
//! aggregates grow, divide, and carry the down-/up-regulated cell counts the
//! quorum-sensing machinery operates on. EPS aggregates are inert point
//! masses emitted when a compartment's EPS accumulator fills up.

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::config::Parameters;
use crate::kinetics::{cell_mass_derivative, probability_down2up, probability_up2down};

/// A particle held by a compartment
#[derive(Debug, Clone)]
pub enum Particle {
    /// Living cell aggregate
    Cell(CellAggregate),
    /// Inert extracellular polymeric substance aggregate
    Eps(EpsAggregate),
}

impl Particle {
    /// Particle mass (fg)
    pub fn mass_fg(&self) -> f64 {
        match self {
            Particle::Cell(cell) => cell.mass_fg,
            Particle::Eps(eps) => eps.mass_fg,
        }
    }

    /// The contained cell aggregate, if this is a cell particle
    pub fn as_cell(&self) -> Option<&CellAggregate> {
        match self {
            Particle::Cell(cell) => Some(cell),
            Particle::Eps(_) => None,
        }
    }

    /// Mutable access to the contained cell aggregate
    pub fn as_cell_mut(&mut self) -> Option<&mut CellAggregate> {
        match self {
            Particle::Cell(cell) => Some(cell),
            Particle::Eps(_) => None,
        }
    }
}

/// Aggregate of bacterial cells with a shared mass and regulation state
///
/// The total cell count tracks mass through the shared average single-cell
/// mass: `set_mass` keeps `num_down + num_up` within one average-cell-mass
/// band of `mass / avg_mass`. Counts never go negative.
#[derive(Debug, Clone)]
pub struct CellAggregate {
    /// Aggregate mass (fg), strictly positive
    pub mass_fg: f64,
    /// Number of down-regulated cells
    pub num_down: u32,
    /// Number of up-regulated cells
    pub num_up: u32,
}

impl CellAggregate {
    /// Create an aggregate; all cells start down-regulated
    pub fn new(mass_fg: f64, avg_mass_fg: f64) -> Self {
        Self {
            mass_fg,
            num_down: (mass_fg / avg_mass_fg).ceil() as u32,
            num_up: 0,
        }
    }

    /// Total number of cells in the aggregate
    pub fn num_cells(&self) -> u32 {
        self.num_down + self.num_up
    }

    /// Update mass and rebalance the cell counts into the tolerance band
    ///
    /// New cells appear down-regulated; deficit removes down-regulated cells
    /// first, then up-regulated ones.
    pub fn set_mass(&mut self, mass_fg: f64, avg_mass_fg: f64) {
        self.mass_fg = mass_fg;
        while mass_fg - avg_mass_fg > avg_mass_fg * f64::from(self.num_cells()) {
            self.num_down += 1;
        }
        while mass_fg + avg_mass_fg < avg_mass_fg * f64::from(self.num_cells()) {
            if self.num_down > 0 {
                self.num_down -= 1;
            } else if self.num_up > 0 {
                self.num_up -= 1;
            } else {
                break;
            }
        }
    }

    /// Switch one cell from down- to up-regulated
    fn switch_up(&mut self) {
        self.num_down -= 1;
        self.num_up += 1;
    }

    /// Switch one cell from up- to down-regulated
    fn switch_down(&mut self) {
        self.num_up -= 1;
        self.num_down += 1;
    }

    /// One Euler step of mass growth plus stochastic regulation switching
    ///
    /// Each down-regulated cell independently switches up with probability
    /// `dt·Q⁺(qsm, qsi)`, then each up-regulated cell switches down with
    /// probability `dt·Q⁻(qsm, qsi)`. One uniform draw per cell per step.
    pub fn grow<R: Rng>(
        &mut self,
        uptake_rate: f64,
        conc_qsm: f64,
        conc_qsi: f64,
        params: &Parameters,
        rng: &mut R,
    ) {
        let dt = params.dt_min;
        let mass = self.mass_fg + dt * cell_mass_derivative(self.mass_fg, uptake_rate, &params.kinetics);
        self.set_mass(mass, params.cell.avg_mass_fg);

        let p_up = dt * probability_down2up(conc_qsm, conc_qsi, &params.regulation);
        for _ in 0..self.num_down {
            if rng.gen::<f64>() < p_up {
                self.switch_up();
            }
        }

        // Up count is re-read here, after the first pass has run
        let p_down = dt * probability_up2down(conc_qsm, conc_qsi, &params.regulation);
        for _ in 0..self.num_up {
            if rng.gen::<f64>() < p_down {
                self.switch_down();
            }
        }
    }

    /// Divide the aggregate, returning the newly created sibling
    ///
    /// A fraction `f ~ U(0.4, 0.6)` of the mass stays here; the sibling gets
    /// the rest and starts fully down-regulated. The surviving up-regulated
    /// cells are then re-established one at a time: for each, the aggregate
    /// with the *smaller* share of the combined down-count is the more likely
    /// recipient (inherited tie-break rule, kept as-is for reproducibility).
    pub fn split<R: Rng>(&mut self, params: &Parameters, rng: &mut R) -> CellAggregate {
        let avg = params.cell.avg_mass_fg;
        let fraction = Uniform::new(0.4, 0.6).sample(rng);

        let mut sibling = CellAggregate::new((1.0 - fraction) * self.mass_fg, avg);
        self.set_mass(self.mass_fg * fraction, avg);

        let n = self.num_up;
        for _ in 0..n {
            let total_down = self.num_down + sibling.num_down;
            if total_down == 0 {
                break;
            }
            let own_share = f64::from(self.num_down) / f64::from(total_down);
            if own_share < rng.gen::<f64>() {
                if self.num_down > 0 {
                    self.switch_up();
                } else {
                    sibling.switch_up();
                }
            } else if sibling.num_down > 0 {
                sibling.switch_up();
            } else {
                self.switch_up();
            }
        }

        sibling
    }
}

/// Inert EPS aggregate; mass fixed at creation
#[derive(Debug, Clone)]
pub struct EpsAggregate {
    /// Aggregate mass (fg)
    pub mass_fg: f64,
}

impl EpsAggregate {
    pub fn new(mass_fg: f64) -> Self {
        Self { mass_fg }
    }
}
