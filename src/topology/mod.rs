//! Topology Module: Persistent Homology of Atomic Point Clouds
//!
//! Implements the mathematical structures for topological data analysis:
//! - Vietoris-Rips filtration
//! - Exact persistent homology by boundary matrix reduction
//! - Betti numbers extraction
//!
//! ## Mathematical Background
//!
//! For the atoms X of a crystal structure we construct a filtration of
//! simplicial complexes VR_ε(X) indexed by the scale parameter ε (Å). The
//! persistent homology tracks the birth and death of topological features
//! (atom clusters, channels, enclosed voids) across this filtration.

mod betti;
mod persistence;
mod vietoris_rips;

pub use betti::{BettiCurve, BettiNumbers};
pub use persistence::{
    compute_persistence, BoundaryReduction, ColumnOutcome, PersistenceDiagram, PersistencePair,
    SparseColumn,
};
pub use vietoris_rips::{FilteredSimplex, Filtration, Simplex, VietorisRips};
