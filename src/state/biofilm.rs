//! Biofilm lattice: the full compartment grid and the synchronized step.
//!
//! The lattice owns every compartment in one contiguous store, indexed by
//! flattened `x + nx·y + nx·ny·z`. One `step()` sweeps compartments in
//! ascending flattened index and runs the complete per-compartment phase
//! sequence before moving on. Migration mutates neighbour particle sets
//! during the sweep, so later compartments observe a partially-updated
//! neighbourhood; with a fixed RNG seed the whole step is bit-for-bit
//! reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Parameters;
use crate::state::vortex::Vortex;

/// 3D lattice of compartments plus the simulation RNG
pub struct Biofilm {
    params: Parameters,
    vortices: Vec<Vortex>,
    nx: usize,
    ny: usize,
    nz: usize,
    time_step: u64,
    rng: StdRng,
}

impl Biofilm {
    /// Build an empty lattice from the configured geometry, with a seeded RNG
    pub fn new(params: Parameters, rng_seed: u64) -> Self {
        Self::with_rng(params, StdRng::seed_from_u64(rng_seed))
    }

    /// Build an empty lattice with a caller-supplied RNG
    pub fn with_rng(params: Parameters, rng: StdRng) -> Self {
        let (nx, ny, nz) = params.lattice.dimensions();
        let capacity = params.max_particles_per_vortex();

        let mut vortices = Vec::with_capacity(nx * ny * nz);
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    vortices.push(Vortex::new(x, y, z, capacity));
                }
            }
        }

        Self {
            params,
            vortices,
            nx,
            ny,
            nz,
            time_step: 0,
            rng,
        }
    }

    /// Lattice dimensions in compartments
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    /// Number of completed steps
    pub fn time_step(&self) -> u64 {
        self.time_step
    }

    /// Elapsed simulated time (minutes)
    pub fn time_min(&self) -> f64 {
        self.time_step as f64 * self.params.dt_min
    }

    /// The configured parameters
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// All compartments in flattened-index order
    pub fn vortices(&self) -> &[Vortex] {
        &self.vortices
    }

    /// Mutable compartment access (seeding and boundary hooks)
    pub fn vortices_mut(&mut self) -> &mut [Vortex] {
        &mut self.vortices
    }

    fn flatten(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.nx * y + self.nx * self.ny * z
    }

    /// Compartment at a lattice position, if inside the domain
    pub fn vortex_at(&self, x: usize, y: usize, z: usize) -> Option<&Vortex> {
        if x < self.nx && y < self.ny && z < self.nz {
            Some(&self.vortices[self.flatten(x, y, z)])
        } else {
            None
        }
    }

    /// Flattened indices of the face neighbours of `(x, y, z)`
    ///
    /// Up to six axis-aligned neighbours; positions outside the domain are
    /// excluded on every axis (no periodic wrap), so boundary compartments
    /// have fewer than six.
    pub fn neighbor_indices(&self, x: usize, y: usize, z: usize) -> Vec<usize> {
        let offsets: [(isize, isize, isize); 6] = [
            (1, 0, 0),
            (-1, 0, 0),
            (0, 1, 0),
            (0, -1, 0),
            (0, 0, 1),
            (0, 0, -1),
        ];
        let mut neighbors = Vec::with_capacity(6);
        for (dx, dy, dz) in offsets {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            let nz = z as isize + dz;
            if nx >= 0
                && (nx as usize) < self.nx
                && ny >= 0
                && (ny as usize) < self.ny
                && nz >= 0
                && (nz as usize) < self.nz
            {
                neighbors.push(self.flatten(nx as usize, ny as usize, nz as usize));
            }
        }
        neighbors
    }

    /// Total number of particles across the lattice
    pub fn total_particle_count(&self) -> usize {
        self.vortices.iter().map(Vortex::particle_count).sum()
    }

    /// Advance the whole lattice by one timestep
    pub fn step(&mut self) {
        self.time_step += 1;
        for idx in 0..self.vortices.len() {
            let (x, y, z) = self.vortices[idx].position();
            let neighbors = self.neighbor_indices(x, y, z);

            self.vortices[idx].commit_concentrations();
            self.vortices[idx].update_particles(&self.params, &mut self.rng);
            self.vortices[idx].update_eps(&self.params);
            self.migrate_particles(idx, &neighbors);

            let neighbor_concs: Vec<(f64, f64, f64)> = neighbors
                .iter()
                .map(|&n| {
                    let v = &self.vortices[n];
                    (v.conc_subst(), v.conc_qsm(), v.conc_qsi())
                })
                .collect();
            self.vortices[idx].update_concentrations(&self.params, &neighbor_concs);
        }
    }

    /// Phase 4: push particles toward lower-pressure neighbours
    ///
    /// The outflow count is `Σ floor(μ·Δp·ΔN)` over neighbours with strictly
    /// lower pressure *and* strictly fewer particles. Destinations are drawn
    /// from a distribution with weights `Δp⁺ / Σ Δp`; the denominator is the
    /// *signed* total on purpose (inherited normalization, see DESIGN.md).
    /// A non-positive signed total short-circuits to no migration.
    fn migrate_particles(&mut self, idx: usize, neighbors: &[usize]) {
        let capacity = self.params.max_particles_per_vortex();
        let mu = self.params.transport.transfer_coefficient;

        self.vortices[idx].refresh_pressure(capacity);
        let own_pressure = self.vortices[idx].pressure();
        let own_count = self.vortices[idx].particle_count();

        let mut outflow: u64 = 0;
        let mut total_diff = 0.0;
        for &n_idx in neighbors {
            let neighbor_pressure = self.vortices[n_idx].pressure();
            let neighbor_count = self.vortices[n_idx].particle_count();
            if own_pressure > neighbor_pressure && own_count > neighbor_count {
                outflow += (mu
                    * (own_pressure - neighbor_pressure)
                    * (own_count - neighbor_count) as f64)
                    .floor() as u64;
            }
            total_diff += own_pressure - neighbor_pressure;
        }

        if outflow == 0 || neighbors.is_empty() || total_diff <= 0.0 {
            return;
        }

        // Cumulative destination distribution; higher-pressure neighbours
        // carry zero weight
        let mut cumulative = Vec::with_capacity(neighbors.len());
        let mut acc = 0.0;
        for &n_idx in neighbors {
            let neighbor_pressure = self.vortices[n_idx].pressure();
            if own_pressure > neighbor_pressure {
                acc += (own_pressure - neighbor_pressure) / total_diff;
            }
            cumulative.push(acc);
        }

        for _ in 0..outflow {
            if self.vortices[idx].particle_count() == 0 {
                break;
            }
            let r = self.rng.gen::<f64>();
            if let Some(chosen) = cumulative.iter().position(|&p| r < p) {
                let count = self.vortices[idx].particle_count();
                let particle_index = self.rng.gen_range(0..count);
                let particle = self.vortices[idx].remove_particle_at(particle_index);
                self.vortices[neighbors[chosen]].add_particle(particle, capacity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Parameters;
    use crate::state::particle::{EpsAggregate, Particle};

    #[test]
    fn test_neighbor_counts() {
        let params = Parameters::default();
        let biofilm = Biofilm::new(params, 0);
        let (nx, ny, nz) = biofilm.dimensions();
        assert_eq!((nx, ny, nz), (5, 5, 10));

        // Corner: 3 neighbours
        assert_eq!(biofilm.neighbor_indices(0, 0, 0).len(), 3);
        // Face-interior on the substratum: 5 neighbours
        assert_eq!(biofilm.neighbor_indices(2, 2, 0).len(), 5);
        // Interior: exactly 6
        assert_eq!(biofilm.neighbor_indices(2, 2, 5).len(), 6);
        // Top corner: 3
        assert_eq!(biofilm.neighbor_indices(4, 4, 9).len(), 3);
    }

    #[test]
    fn test_flattened_indexing() {
        let params = Parameters::default();
        let biofilm = Biofilm::new(params, 0);

        let vortex = biofilm.vortex_at(3, 2, 7).unwrap();
        assert_eq!(vortex.position(), (3, 2, 7));
        assert!(biofilm.vortex_at(5, 0, 0).is_none());
        assert!(biofilm.vortex_at(0, 0, 10).is_none());
    }

    #[test]
    fn test_migration_conserves_particles() {
        let params = Parameters::default();
        let capacity = params.max_particles_per_vortex();
        let mut biofilm = Biofilm::new(params, 99);
        let max_eps = biofilm.params().max_eps_mass_fg();

        // Crowd one compartment with inert particles (no splits, no growth)
        for _ in 0..40 {
            biofilm.vortices_mut()[0]
                .add_particle(Particle::Eps(EpsAggregate::new(max_eps)), capacity);
        }
        let before = biofilm.total_particle_count();
        biofilm.step();
        assert_eq!(
            biofilm.total_particle_count(),
            before,
            "Migration must neither create nor destroy particles"
        );
    }

    #[test]
    fn test_no_migration_without_pressure_gradient() {
        let params = Parameters::default();
        let capacity = params.max_particles_per_vortex();
        let mut biofilm = Biofilm::new(params, 7);
        let max_eps = biofilm.params().max_eps_mass_fg();

        // Uniform load everywhere: no lower-pressure neighbour anywhere
        for vortex in biofilm.vortices_mut() {
            for _ in 0..5 {
                vortex.add_particle(Particle::Eps(EpsAggregate::new(max_eps)), capacity);
            }
        }
        biofilm.step();
        for vortex in biofilm.vortices() {
            assert_eq!(
                vortex.particle_count(),
                5,
                "Zero gradient must move nothing at {:?}",
                vortex.position()
            );
        }
    }
}
