//! Point Cloud: Atoms of One Material
//!
//! A point cloud is the ordered list of atomic sites of a crystal structure,
//! each with a Cartesian position (Å) and a species tag. It is the only input
//! the topology pipeline needs; lattice vectors and occupancies are dropped by
//! the structure loader.

use std::collections::BTreeMap;
use std::io::Write;

use ndarray::Array2;

use crate::error::{Result, TdaError};

/// Immutable cloud of atomic positions `[N, 3]` with one species tag per row.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    positions: Array2<f64>,
    species: Vec<String>,
}

/// Result of collapsing near-coincident points.
#[derive(Debug, Clone)]
pub struct CoincidenceMerge {
    /// One representative per cluster.
    pub cloud: PointCloud,
    /// Pairs of original points closer than epsilon.
    pub collisions: usize,
    /// Cluster index of every original point.
    pub assignment: Vec<usize>,
}

impl CoincidenceMerge {
    /// Number of original points absorbed into another point's cluster.
    pub fn merged_points(&self) -> usize {
        self.assignment.len() - self.cloud.len()
    }
}

impl PointCloud {
    /// Build a cloud from a `[N, 3]` position matrix and `N` species tags.
    pub fn new(positions: Array2<f64>, species: Vec<String>) -> Result<Self> {
        if positions.nrows() == 0 {
            return Err(TdaError::EmptyStructure);
        }
        if positions.ncols() != 3 || species.len() != positions.nrows() {
            return Err(TdaError::InvalidShape {
                rows: positions.nrows(),
                cols: positions.ncols(),
                species: species.len(),
            });
        }
        Ok(Self { positions, species })
    }

    /// Build a cloud from `(position, species)` sites.
    pub fn from_sites<I, S>(sites: I) -> Result<Self>
    where
        I: IntoIterator<Item = ([f64; 3], S)>,
        S: Into<String>,
    {
        let mut coords = Vec::new();
        let mut species = Vec::new();
        for (position, tag) in sites {
            coords.extend_from_slice(&position);
            species.push(tag.into());
        }
        let n = species.len();
        let positions = Array2::from_shape_vec((n, 3), coords).map_err(|_| TdaError::InvalidShape {
            rows: n,
            cols: 3,
            species: n,
        })?;
        Self::new(positions, species)
    }

    pub fn len(&self) -> usize {
        self.positions.nrows()
    }

    /// Always false: construction rejects empty structures.
    pub fn is_empty(&self) -> bool {
        self.positions.nrows() == 0
    }

    pub fn positions(&self) -> &Array2<f64> {
        &self.positions
    }

    pub fn position(&self, i: usize) -> [f64; 3] {
        [
            self.positions[[i, 0]],
            self.positions[[i, 1]],
            self.positions[[i, 2]],
        ]
    }

    pub fn species(&self, i: usize) -> &str {
        &self.species[i]
    }

    /// Number of atoms per species, sorted by species tag.
    pub fn species_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for tag in &self.species {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Euclidean distance between points `i` and `j`.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        let mut dist_sq = 0.0;
        for d in 0..3 {
            let diff = self.positions[[i, d]] - self.positions[[j, d]];
            dist_sq += diff * diff;
        }
        dist_sq.sqrt()
    }

    /// Symmetric Euclidean distance matrix.
    pub fn distance_matrix(&self) -> Array2<f64> {
        let n = self.len();
        let mut dm = Array2::<f64>::zeros((n, n));

        for i in 0..n {
            for j in i + 1..n {
                let dist = self.distance(i, j);
                dm[[i, j]] = dist;
                dm[[j, i]] = dist;
            }
        }

        dm
    }

    /// Diagonal of the axis-aligned bounding box.
    ///
    /// No pairwise distance exceeds it, so it is a safe default `r_max`.
    pub fn bounding_diagonal(&self) -> f64 {
        let mut diag_sq = 0.0;
        for column in self.positions.columns() {
            let lo = column.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            diag_sq += (hi - lo) * (hi - lo);
        }
        diag_sq.sqrt()
    }

    /// Copy with every coordinate multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            positions: &self.positions * factor,
            species: self.species.clone(),
        }
    }

    /// Copy whose `k`-th point is this cloud's `order[k]`-th point.
    pub fn permuted(&self, order: &[usize]) -> Result<Self> {
        let n = self.len();
        let mut seen = vec![false; n];
        for &i in order {
            if i >= n || seen[i] {
                return Err(TdaError::InvalidShape {
                    rows: n,
                    cols: 3,
                    species: order.len(),
                });
            }
            seen[i] = true;
        }
        if order.len() != n {
            return Err(TdaError::InvalidShape {
                rows: n,
                cols: 3,
                species: order.len(),
            });
        }
        let positions = self.positions.select(ndarray::Axis(0), order);
        let species = order.iter().map(|&i| self.species[i].clone()).collect();
        Ok(Self { positions, species })
    }

    /// Collapse points closer than `epsilon` into single representatives.
    ///
    /// Clusters are the connected components of the "closer than epsilon"
    /// graph. Each cluster keeps the lexicographically smallest position among
    /// its members, so the merged cloud does not depend on input order.
    pub fn merge_coincident(&self, epsilon: f64) -> CoincidenceMerge {
        let n = self.len();
        let mut parent: Vec<usize> = (0..n).collect();
        let mut rank = vec![0usize; n];

        fn find(parent: &mut [usize], i: usize) -> usize {
            if parent[i] != i {
                parent[i] = find(parent, parent[i]);
            }
            parent[i]
        }

        fn union(parent: &mut [usize], rank: &mut [usize], x: usize, y: usize) {
            let rx = find(parent, x);
            let ry = find(parent, y);
            if rx != ry {
                if rank[rx] < rank[ry] {
                    parent[rx] = ry;
                } else if rank[rx] > rank[ry] {
                    parent[ry] = rx;
                } else {
                    parent[ry] = rx;
                    rank[rx] += 1;
                }
            }
        }

        let mut collisions = 0;
        for i in 0..n {
            for j in i + 1..n {
                if self.distance(i, j) < epsilon {
                    collisions += 1;
                    union(&mut parent, &mut rank, i, j);
                }
            }
        }

        // Representative per root: lexicographically smallest member position.
        let mut best: BTreeMap<usize, usize> = BTreeMap::new();
        for i in 0..n {
            let root = find(&mut parent, i);
            let entry = best.entry(root).or_insert(i);
            if lex_less(&self.position(i), &self.position(*entry)) {
                *entry = i;
            }
        }

        // Clusters numbered by their first member in input order.
        let mut cluster_of_root: BTreeMap<usize, usize> = BTreeMap::new();
        let mut representatives = Vec::new();
        let mut assignment = Vec::with_capacity(n);
        for i in 0..n {
            let root = find(&mut parent, i);
            let next = cluster_of_root.len();
            let cluster = *cluster_of_root.entry(root).or_insert_with(|| {
                representatives.push(best[&root]);
                next
            });
            assignment.push(cluster);
        }

        let cloud = Self {
            positions: self.positions.select(ndarray::Axis(0), &representatives),
            species: representatives.iter().map(|&i| self.species[i].clone()).collect(),
        };

        CoincidenceMerge {
            cloud,
            collisions,
            assignment,
        }
    }

    /// Write coordinates as whitespace-separated text with an `X Y Z` header.
    pub fn write_coordinates<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "# X Y Z")?;
        for row in self.positions.rows() {
            writeln!(out, "{:.6} {:.6} {:.6}", row[0], row[1], row[2])?;
        }
        out.flush()?;
        Ok(())
    }
}

fn lex_less(a: &[f64; 3], b: &[f64; 3]) -> bool {
    a[0].total_cmp(&b[0])
        .then(a[1].total_cmp(&b[1]))
        .then(a[2].total_cmp(&b[2]))
        .is_lt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn square() -> PointCloud {
        PointCloud::from_sites([
            ([0.0, 0.0, 0.0], "Pb"),
            ([1.0, 0.0, 0.0], "Pb"),
            ([0.0, 1.0, 0.0], "Cu"),
            ([1.0, 1.0, 0.0], "O"),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_structure_rejected() {
        let empty = PointCloud::from_sites(Vec::<([f64; 3], String)>::new());
        assert!(matches!(empty, Err(TdaError::EmptyStructure)));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let positions = array![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let result = PointCloud::new(positions, vec!["Cu".to_string()]);
        assert!(matches!(result, Err(TdaError::InvalidShape { rows: 2, .. })));
    }

    #[test]
    fn test_distances_and_diagonal() {
        let cloud = square();
        assert!((cloud.distance(0, 3) - 2.0_f64.sqrt()).abs() < 1e-12);
        let dm = cloud.distance_matrix();
        assert_eq!(dm[[1, 2]], dm[[2, 1]]);
        assert!((cloud.bounding_diagonal() - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_species_counts() {
        let counts = square().species_counts();
        assert_eq!(counts["Pb"], 2);
        assert_eq!(counts["Cu"], 1);
        assert_eq!(counts["O"], 1);
    }

    #[test]
    fn test_merge_coincident_collapses_cluster() {
        let cloud = PointCloud::from_sites([
            ([0.0, 0.0, 0.0], "Cu"),
            ([5.0, 0.0, 0.0], "O"),
            ([1e-8, 0.0, 0.0], "Cu"),
            ([-1e-8, 0.0, 0.0], "Cu"),
        ])
        .unwrap();

        let merged = cloud.merge_coincident(1e-6);
        assert_eq!(merged.cloud.len(), 2);
        assert_eq!(merged.collisions, 3);
        assert_eq!(merged.merged_points(), 2);
        assert_eq!(merged.assignment, vec![0, 1, 0, 0]);
        // Smallest position wins regardless of listing order.
        assert_eq!(merged.cloud.position(0), [-1e-8, 0.0, 0.0]);
    }

    #[test]
    fn test_permuted_rejects_non_permutation() {
        let cloud = square();
        assert!(cloud.permuted(&[0, 0, 1, 2]).is_err());
        let p = cloud.permuted(&[3, 2, 1, 0]).unwrap();
        assert_eq!(p.position(0), [1.0, 1.0, 0.0]);
        assert_eq!(p.species(0), "O");
    }

    #[test]
    fn test_write_coordinates() {
        let mut buf = Vec::new();
        square().write_coordinates(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "# X Y Z");
        assert_eq!(lines[4], "1.000000 1.000000 0.000000");
    }

    struct FailingFlush(Vec<u8>);

    impl Write for FailingFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("disk full"))
        }
    }

    #[test]
    fn test_write_coordinates_reports_flush_error() {
        let result = square().write_coordinates(FailingFlush(Vec::new()));
        assert!(matches!(result, Err(TdaError::Io(_))));
    }
}
