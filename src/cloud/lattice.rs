//! Synthetic Crystal Lattices
//!
//! Ideal and thermally disordered supercells used as reference structures
//! when no structure files are at hand:
//!
//! - **Simple cubic**: one atom per cell, channels along every axis
//! - **FCC**: four atoms per cell, close packed (tetrahedral/octahedral voids)
//! - **ABO₃ perovskite**: the parent structure of the cuprates
//!
//! Thermal disorder is modelled as independent Gaussian displacements with
//! standard deviation σ (Å) per Cartesian component.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::cloud::PointCloud;
use crate::error::{Result, TdaError};

/// Cubic lattice described by a fractional basis.
#[derive(Debug, Clone)]
pub struct CubicLattice {
    /// Fractional coordinates and species of the basis atoms
    basis: Vec<([f64; 3], String)>,
    /// Cubic cell edge (Å)
    lattice_constant: f64,
    /// Cells per axis
    repeats: usize,
}

impl CubicLattice {
    pub fn new(basis: Vec<([f64; 3], String)>, lattice_constant: f64, repeats: usize) -> Self {
        Self {
            basis,
            lattice_constant,
            repeats,
        }
    }

    pub fn simple_cubic(species: &str, lattice_constant: f64, repeats: usize) -> Self {
        Self::new(vec![([0.0, 0.0, 0.0], species.to_string())], lattice_constant, repeats)
    }

    pub fn fcc(species: &str, lattice_constant: f64, repeats: usize) -> Self {
        let basis = [
            [0.0, 0.0, 0.0],
            [0.5, 0.5, 0.0],
            [0.5, 0.0, 0.5],
            [0.0, 0.5, 0.5],
        ]
        .into_iter()
        .map(|f| (f, species.to_string()))
        .collect();
        Self::new(basis, lattice_constant, repeats)
    }

    /// ABO₃ perovskite: A on the corner, B in the body centre, O on the faces.
    pub fn perovskite(a: &str, b: &str, lattice_constant: f64, repeats: usize) -> Self {
        let basis = vec![
            ([0.0, 0.0, 0.0], a.to_string()),
            ([0.5, 0.5, 0.5], b.to_string()),
            ([0.5, 0.5, 0.0], "O".to_string()),
            ([0.5, 0.0, 0.5], "O".to_string()),
            ([0.0, 0.5, 0.5], "O".to_string()),
        ];
        Self::new(basis, lattice_constant, repeats)
    }

    pub fn n_atoms(&self) -> usize {
        self.basis.len() * self.repeats.pow(3)
    }

    /// Ideal supercell.
    pub fn build(&self) -> Result<PointCloud> {
        let a = self.lattice_constant;
        let mut sites = Vec::with_capacity(self.n_atoms());

        for ix in 0..self.repeats {
            for iy in 0..self.repeats {
                for iz in 0..self.repeats {
                    for (frac, species) in &self.basis {
                        let position = [
                            (ix as f64 + frac[0]) * a,
                            (iy as f64 + frac[1]) * a,
                            (iz as f64 + frac[2]) * a,
                        ];
                        sites.push((position, species.clone()));
                    }
                }
            }
        }

        PointCloud::from_sites(sites)
    }

    /// Supercell with Gaussian thermal displacements of width `sigma`.
    pub fn jittered<R: Rng + ?Sized>(&self, sigma: f64, rng: &mut R) -> Result<PointCloud> {
        let normal = Normal::new(0.0, sigma)
            .map_err(|e| TdaError::InvalidParameter(format!("thermal sigma {sigma}: {e}")))?;
        let ideal = self.build()?;

        let mut sites = Vec::with_capacity(ideal.len());
        for i in 0..ideal.len() {
            let mut p = ideal.position(i);
            for c in p.iter_mut() {
                *c += normal.sample(&mut *rng);
            }
            sites.push((p, ideal.species(i).to_string()));
        }
        PointCloud::from_sites(sites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_atom_counts() {
        assert_eq!(CubicLattice::simple_cubic("Po", 3.35, 3).build().unwrap().len(), 27);
        assert_eq!(CubicLattice::fcc("Pb", 4.95, 2).build().unwrap().len(), 32);
        let perovskite = CubicLattice::perovskite("Sr", "Ti", 3.905, 2).build().unwrap();
        assert_eq!(perovskite.len(), 40);
        assert_eq!(perovskite.species_counts()["O"], 24);
    }

    #[test]
    fn test_nearest_neighbour_spacing() {
        let cloud = CubicLattice::simple_cubic("Po", 2.0, 2).build().unwrap();
        let dm = cloud.distance_matrix();
        let nn = dm.iter().copied().filter(|&d| d > 0.0).fold(f64::INFINITY, f64::min);
        assert!((nn - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_jitter_is_seeded_and_small() {
        let lattice = CubicLattice::fcc("Pb", 4.95, 1);
        let a = lattice.jittered(0.01, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = lattice.jittered(0.01, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);

        let ideal = lattice.build().unwrap();
        for i in 0..ideal.len() {
            let p = ideal.position(i);
            let q = a.position(i);
            let shift: f64 = (0..3).map(|d| (p[d] - q[d]).powi(2)).sum::<f64>().sqrt();
            assert!(shift < 0.1);
        }
    }

    #[test]
    fn test_negative_sigma_rejected() {
        let lattice = CubicLattice::simple_cubic("Po", 3.35, 1);
        assert!(lattice.jittered(-1.0, &mut StdRng::seed_from_u64(1)).is_err());
    }
}
