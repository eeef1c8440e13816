//! Compartment ("vortex") state and per-step update phases.
//!
//! A vortex is one cubic cell of the lattice. It owns its particles, an EPS
//! accumulator, and three double-buffered concentrations (substrate, QSM,
//! QSI). The lattice sweep runs the phases of `Vortex` in a fixed order per
//! compartment: buffer commit, particle growth/division, EPS accumulation,
//! pressure-driven migration (orchestrated by `Biofilm`), and the
//! concentration Euler step into the *next* buffers.

use rand::Rng;

use crate::config::Parameters;
use crate::kinetics::{concentration_derivative, eps_production_rate, monod_uptake_rate};
use crate::state::particle::{CellAggregate, EpsAggregate, Particle};

/// Finite stand-in for the pressure of a compartment at or over capacity.
///
/// Debug builds treat that state as a precondition violation; release builds
/// clamp so pressure differences stay usable arithmetic.
pub const PRESSURE_CLAMP: f64 = 1e9;

/// Pressure of a compartment holding `count` particles.
///
/// `p = N / (capacity − N)`, clamped once `N ≥ capacity`.
pub fn compartment_pressure(count: usize, capacity: f64) -> f64 {
    let n = count as f64;
    debug_assert!(
        n < capacity,
        "particle count {} at or over compartment capacity {}",
        count,
        capacity
    );
    if n >= capacity {
        PRESSURE_CLAMP
    } else {
        n / (capacity - n)
    }
}

/// One cubic compartment of the biofilm lattice
#[derive(Debug, Clone)]
pub struct Vortex {
    x: usize,
    y: usize,
    z: usize,
    /// Particles held by this compartment; always a fresh collection per
    /// vortex, never shared
    particles: Vec<Particle>,
    /// EPS mass accumulated but not yet emitted as a particle (fg)
    eps_amount_fg: f64,
    conc_subst: f64,
    conc_qsm: f64,
    conc_qsi: f64,
    next_subst: f64,
    next_qsm: f64,
    next_qsi: f64,
    /// Cached pressure; refreshed in `add_particle` and at the start of the
    /// migration phase. Removals leave it stale on purpose: later
    /// compartments in the same sweep read exactly this cached value.
    pressure: f64,
}

impl Vortex {
    /// Create an empty compartment at the given lattice position
    pub fn new(x: usize, y: usize, z: usize, capacity: f64) -> Self {
        Self {
            x,
            y,
            z,
            particles: Vec::new(),
            eps_amount_fg: 0.0,
            conc_subst: 0.0,
            conc_qsm: 0.0,
            conc_qsi: 0.0,
            next_subst: 0.0,
            next_qsm: 0.0,
            next_qsi: 0.0,
            pressure: compartment_pressure(0, capacity),
        }
    }

    // === Read-only snapshot interface ===

    /// Lattice position (x, y, z)
    pub fn position(&self) -> (usize, usize, usize) {
        (self.x, self.y, self.z)
    }

    /// Current substrate concentration (g/l)
    pub fn conc_subst(&self) -> f64 {
        self.conc_subst
    }

    /// Current QSM concentration (g/l)
    pub fn conc_qsm(&self) -> f64 {
        self.conc_qsm
    }

    /// Current QSI concentration (g/l)
    pub fn conc_qsi(&self) -> f64 {
        self.conc_qsi
    }

    /// Particles currently held
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particles currently held
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// EPS mass waiting in the accumulator (fg)
    pub fn eps_amount_fg(&self) -> f64 {
        self.eps_amount_fg
    }

    /// Cached pressure value
    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    /// Total particle mass in this compartment (fg)
    pub fn total_mass_fg(&self) -> f64 {
        self.particles.iter().map(Particle::mass_fg).sum()
    }

    /// Total cell aggregate mass in this compartment (fg)
    pub fn cell_mass_fg(&self) -> f64 {
        self.cells().map(|c| c.mass_fg).sum()
    }

    /// Total down- and up-regulated cell counts
    pub fn regulation_counts(&self) -> (u64, u64) {
        self.cells().fold((0, 0), |(down, up), cell| {
            (down + u64::from(cell.num_down), up + u64::from(cell.num_up))
        })
    }

    fn cells(&self) -> impl Iterator<Item = &CellAggregate> {
        self.particles.iter().filter_map(Particle::as_cell)
    }

    // === Mutation used by seeding, boundary hook, and migration ===

    /// Add a particle and refresh the cached pressure
    pub fn add_particle(&mut self, particle: Particle, capacity: f64) {
        self.particles.push(particle);
        self.pressure = compartment_pressure(self.particles.len(), capacity);
    }

    /// Remove and return the particle at `index`, preserving order
    pub(crate) fn remove_particle_at(&mut self, index: usize) -> Particle {
        self.particles.remove(index)
    }

    /// Recompute the cached pressure from the current particle count
    pub(crate) fn refresh_pressure(&mut self, capacity: f64) {
        self.pressure = compartment_pressure(self.particles.len(), capacity);
    }

    /// Pin the substrate concentration in both buffers (boundary hook)
    pub fn pin_substrate(&mut self, conc: f64) {
        self.conc_subst = conc;
        self.next_subst = conc;
    }

    /// Drop all particles (boundary hook); the pressure cache is left as-is
    /// and refreshed when this compartment's own migration phase runs
    pub fn clear_particles(&mut self) {
        self.particles.clear();
    }

    // === Per-step update phases ===

    /// Phase 1: commit the previous step's pending concentrations
    pub(crate) fn commit_concentrations(&mut self) {
        self.conc_subst = self.next_subst;
        self.conc_qsm = self.next_qsm;
        self.conc_qsi = self.next_qsi;
    }

    /// Phase 2: cell division and growth
    ///
    /// Index loop over a growing collection: aggregates appended by a split
    /// are visited later in this same sweep.
    pub(crate) fn update_particles<R: Rng>(&mut self, params: &Parameters, rng: &mut R) {
        let capacity = params.max_particles_per_vortex();
        let conc_subst = self.conc_subst;
        let conc_qsm = self.conc_qsm;
        let conc_qsi = self.conc_qsi;

        let mut i = 0;
        while i < self.particles.len() {
            let mut sibling = None;
            if let Particle::Cell(cell) = &mut self.particles[i] {
                if cell.mass_fg > params.cell.max_mass_fg {
                    sibling = Some(Particle::Cell(cell.split(params, rng)));
                }
                let uptake = monod_uptake_rate(conc_subst, cell.mass_fg, &params.kinetics);
                cell.grow(uptake, conc_qsm, conc_qsi, params, rng);
            }
            if let Some(particle) = sibling {
                self.add_particle(particle, capacity);
            }
            i += 1;
        }
    }

    /// Phase 3: accumulate EPS production and emit aggregates over threshold
    pub(crate) fn update_eps(&mut self, params: &Parameters) {
        let rate = eps_production_rate(self.cells(), &params.regulation);
        self.eps_amount_fg += params.dt_min * rate;

        let max_eps = params.max_eps_mass_fg();
        while self.eps_amount_fg > max_eps {
            self.particles.push(Particle::Eps(EpsAggregate::new(max_eps)));
            self.eps_amount_fg -= max_eps;
        }
    }

    /// Phase 5: Euler step of the three concentrations into the next buffers
    ///
    /// `neighbor_concs` carries the (substrate, QSM, QSI) triples of the face
    /// neighbours as they read at this point of the lattice sweep.
    pub(crate) fn update_concentrations(
        &mut self,
        params: &Parameters,
        neighbor_concs: &[(f64, f64, f64)],
    ) {
        let reg = &params.regulation;
        let cs0 = self.conc_subst;
        let qsm0 = self.conc_qsm;
        let qsi0 = self.conc_qsi;

        let mut prod_subst = 0.0;
        let mut prod_qsm = 0.0;
        let prod_qsi = 0.0;
        for cell in self.cells() {
            prod_subst -= monod_uptake_rate(cs0, cell.mass_fg, &params.kinetics);
            if qsm0 != 0.0 {
                prod_qsm += reg.eps_rate_up_Zu * f64::from(cell.num_up) * qsm0
                    / (reg.qsm_feedback_Kq + qsm0)
                    + reg.eps_rate_down_Zd * f64::from(cell.num_down);
            }
        }

        let subst_neigh: Vec<f64> = neighbor_concs.iter().map(|c| c.0).collect();
        let qsm_neigh: Vec<f64> = neighbor_concs.iter().map(|c| c.1).collect();
        let qsi_neigh: Vec<f64> = neighbor_concs.iter().map(|c| c.2).collect();

        let dt = params.dt_min;
        let vl = params.lattice.vortex_length_um;
        let transport = &params.transport;

        self.next_subst = cs0
            + dt * concentration_derivative(cs0, &subst_neigh, transport.diffusion_substrate, prod_subst, vl);
        // The QSM step takes the QSI production term and vice versa. This
        // crossing is deliberate model behavior; swapping it back changes
        // every regulated output downstream.
        self.next_qsm = qsm0
            + dt * concentration_derivative(qsm0, &qsm_neigh, transport.diffusion_qsm, prod_qsi, vl);
        self.next_qsi = qsi0
            + dt * concentration_derivative(qsi0, &qsi_neigh, transport.diffusion_qsi, prod_qsm, vl);
    }
}
