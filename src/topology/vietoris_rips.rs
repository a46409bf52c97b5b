//! Vietoris-Rips Filtration Construction
//!
//! The Vietoris-Rips complex VR_ε(X) is a simplicial complex where:
//! - 0-simplices are the points in X
//! - A k-simplex [v₀, ..., vₖ] exists iff d(vᵢ, vⱼ) ≤ ε for all i,j
//!
//! Sweeping ε from 0 to `r_max` gives a filtration: every simplex enters at
//! the length of its longest edge, so its faces are always already present.
//!
//! ## Ordering
//!
//! Simplices are sorted by (threshold, dimension, enumeration order). The
//! enumeration is a depth-first clique search over increasing vertex indices,
//! which lists same-dimension simplices lexicographically. The sort is
//! stable, so the resulting order is fully determined by the point cloud.

use log::debug;
use ndarray::Array2;

use crate::cloud::PointCloud;
use crate::config::AnalysisConfig;
use crate::error::{Result, TdaError};

/// A simplex represented by its sorted vertex indices.
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Simplex {
    vertices: Vec<usize>,
}

impl Simplex {
    pub fn new(mut vertices: Vec<usize>) -> Self {
        vertices.sort_unstable();
        vertices.dedup();
        Self { vertices }
    }

    pub fn vertex(v: usize) -> Self {
        Self { vertices: vec![v] }
    }

    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn dimension(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// Codimension-1 faces, in order of the removed vertex.
    pub fn faces(&self) -> impl Iterator<Item = Simplex> + '_ {
        let n = if self.vertices.len() > 1 { self.vertices.len() } else { 0 };
        (0..n).map(move |i| {
            let mut face = self.vertices.clone();
            face.remove(i);
            Simplex { vertices: face }
        })
    }
}

/// A simplex together with its entry threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSimplex {
    pub threshold: f64,
    pub simplex: Simplex,
}

/// Simplices of a Vietoris-Rips complex in filtration order.
#[derive(Debug, Clone)]
pub struct Filtration {
    entries: Vec<FilteredSimplex>,
    n_vertices: usize,
    r_max: f64,
    max_dim: usize,
}

impl Filtration {
    pub fn entries(&self) -> &[FilteredSimplex] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilteredSimplex> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn n_vertices(&self) -> usize {
        self.n_vertices
    }

    pub fn r_max(&self) -> f64 {
        self.r_max
    }

    /// Highest homology dimension this filtration can resolve.
    pub fn max_dim(&self) -> usize {
        self.max_dim
    }

    /// Number of simplices per dimension.
    pub fn count_by_dimension(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.max_dim + 2];
        for entry in &self.entries {
            counts[entry.simplex.dimension()] += 1;
        }
        counts
    }

    /// Edges present at scale `epsilon`.
    pub fn edges_at(&self, epsilon: f64) -> Vec<(usize, usize)> {
        self.entries
            .iter()
            .take_while(|e| e.threshold <= epsilon)
            .filter(|e| e.simplex.dimension() == 1)
            .map(|e| (e.simplex.vertices[0], e.simplex.vertices[1]))
            .collect()
    }
}

/// Vietoris-Rips filtration builder
#[derive(Debug, Clone)]
pub struct VietorisRips {
    /// Maximum filtration value
    r_max: f64,
    /// Highest homology dimension of interest
    max_dim: usize,
    /// Optional cap on the number of simplices
    simplex_limit: Option<usize>,
}

impl VietorisRips {
    pub fn new(r_max: f64, max_dim: usize) -> Self {
        Self {
            r_max,
            max_dim,
            simplex_limit: None,
        }
    }

    /// Builder for `cloud` using the configured ceiling, dimension and budget.
    pub fn from_config(config: &AnalysisConfig, cloud: &PointCloud) -> Self {
        Self::new(config.resolve_r_max(cloud), config.max_dim)
            .with_simplex_limit(config.max_simplices)
    }

    pub fn with_simplex_limit(mut self, limit: Option<usize>) -> Self {
        self.simplex_limit = limit;
        self
    }

    pub fn r_max(&self) -> f64 {
        self.r_max
    }

    /// Simplices go one dimension above the reported homology so that every
    /// reported class has something that can fill it.
    pub fn max_simplex_dim(&self) -> usize {
        self.max_dim + 1
    }

    /// Build the filtration for `cloud`.
    pub fn build(&self, cloud: &PointCloud) -> Result<Filtration> {
        let n = cloud.len();
        let distances = cloud.distance_matrix();

        let distinct = count_distinct(&distances);
        if distinct < 2 {
            return Err(TdaError::DegenerateCloud { distinct });
        }

        let mut entries: Vec<FilteredSimplex> = (0..n)
            .map(|v| FilteredSimplex {
                threshold: 0.0,
                simplex: Simplex::vertex(v),
            })
            .collect();

        // Forward neighbourhoods within r_max
        let neighbors: Vec<Vec<usize>> = (0..n)
            .map(|i| (i + 1..n).filter(|&j| distances[[i, j]] <= self.r_max).collect())
            .collect();

        for i in 0..n {
            let mut clique = vec![i];
            self.expand(&distances, &mut clique, 0.0, &neighbors[i], &mut entries)?;
        }

        entries.sort_by(|a, b| {
            a.threshold
                .total_cmp(&b.threshold)
                .then(a.simplex.dimension().cmp(&b.simplex.dimension()))
        });

        let filtration = Filtration {
            entries,
            n_vertices: n,
            r_max: self.r_max,
            max_dim: self.max_dim,
        };
        debug!(
            "vietoris-rips: {} points, r_max = {:.4}, simplices per dimension {:?}",
            n,
            self.r_max,
            filtration.count_by_dimension()
        );
        Ok(filtration)
    }

    /// Depth-first clique enumeration. `candidates` are vertices above the
    /// clique's last vertex that are within `r_max` of every clique vertex.
    fn expand(
        &self,
        distances: &Array2<f64>,
        clique: &mut Vec<usize>,
        threshold: f64,
        candidates: &[usize],
        entries: &mut Vec<FilteredSimplex>,
    ) -> Result<()> {
        for (pos, &k) in candidates.iter().enumerate() {
            let entry = clique
                .iter()
                .map(|&v| distances[[v, k]])
                .fold(threshold, f64::max);

            clique.push(k);
            entries.push(FilteredSimplex {
                threshold: entry,
                simplex: Simplex { vertices: clique.clone() },
            });
            if let Some(limit) = self.simplex_limit {
                if entries.len() > limit {
                    return Err(TdaError::SimplexBudgetExceeded {
                        limit,
                        reached: entries.len(),
                    });
                }
            }

            if clique.len() <= self.max_simplex_dim() {
                let next: Vec<usize> = candidates[pos + 1..]
                    .iter()
                    .copied()
                    .filter(|&c| distances[[k, c]] <= self.r_max)
                    .collect();
                if !next.is_empty() {
                    self.expand(distances, clique, entry, &next, entries)?;
                }
            }
            clique.pop();
        }
        Ok(())
    }
}

/// Points not exactly coincident with an earlier point.
fn count_distinct(distances: &Array2<f64>) -> usize {
    let n = distances.nrows();
    (0..n)
        .filter(|&j| (0..j).all(|i| distances[[i, j]] > 0.0))
        .count()
}
