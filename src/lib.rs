//! # TDA Superconductor Voids
//!
//! Topological fingerprints of the void and channel geometry of candidate
//! superconductor crystal structures, benchmarked against known
//! superconductors (YBCO, MgB₂, ...) alongside electronic descriptors.
//!
//! ### Methodology
//!
//! 1. **Point cloud**: atomic sites of one structure (Å)
//!
//! 2. **Vietoris-Rips filtration**: simplicial complexes over the atoms at
//!    every scale ε up to `r_max`
//!
//! 3. **Persistent homology**: exact birth/death pairs by boundary matrix
//!    reduction (β₀ clusters, β₁ channels, β₂ voids)
//!
//! 4. **Summary**: Betti numbers at reference scales, total persistence,
//!    longest lifetimes and persistence entropy per dimension
//!
//! 5. **Comparison**: one row per material with λ (electron-phonon coupling)
//!    and the ℤ₂ invariant, written as CSV
//!
//! ## Example
//!
//! ```
//! use tda_sc_voids::{analyze_batch, AnalysisConfig, CubicLattice, DescriptorTable, MaterialInput};
//!
//! let cloud = CubicLattice::perovskite("Sr", "Ti", 3.905, 1).build().unwrap();
//! let config = AnalysisConfig { max_dim: 1, ..Default::default() };
//! let inputs = vec![MaterialInput::new("SrTiO3", cloud)];
//! let table = analyze_batch(inputs, &config, &DescriptorTable::new()).unwrap();
//! assert_eq!(table.records().len(), 1);
//! ```
//!
//! ## References
//!
//! - Edelsbrunner & Harer, "Computational Topology" (2010)
//! - Zomorodian & Carlsson, "Computing Persistent Homology" (2005)

pub mod cloud;
pub mod comparison;
pub mod config;
pub mod error;
pub mod summary;
pub mod topology;

pub use cloud::{CoincidenceMerge, CubicLattice, PointCloud, StructureLoader, XyzLoader};
pub use comparison::{
    analyze_batch, analyze_cloud, AnalysisWarning, ComparisonTable, Descriptor, DescriptorProvider,
    DescriptorTable, ElectronicDescriptors, MaterialAnalysis, MaterialFailure, MaterialInput,
    MaterialRecord,
};
pub use config::AnalysisConfig;
pub use error::{ConfigError, TdaError};
pub use summary::{Summarizer, TopologicalSummary};
pub use topology::{
    compute_persistence, BettiCurve, BettiNumbers, Filtration, PersistenceDiagram, PersistencePair,
    Simplex, VietorisRips,
};
