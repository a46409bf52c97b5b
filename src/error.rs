//! Error types for the void-fingerprint pipeline.
//!
//! Two families exist. [`TdaError`] covers everything that can go wrong while
//! analysing a single material; the batch driver records it against that
//! material and keeps going. [`ConfigError`] signals caller error and aborts
//! the whole run before any material is touched.

use std::path::PathBuf;

use thiserror::Error;

/// Per-material failure.
#[derive(Debug, Error)]
pub enum TdaError {
    /// The structure contained no atoms.
    #[error("structure contains no atoms")]
    EmptyStructure,

    /// Positions and species do not describe a `[N, 3]` cloud.
    #[error("invalid point cloud shape: {rows} positions x {cols} coordinates, {species} species tags")]
    InvalidShape {
        rows: usize,
        cols: usize,
        species: usize,
    },

    /// Fewer than two distinct points remain once coincident atoms are merged.
    #[error("degenerate point cloud: only {distinct} distinct point(s) after merging")]
    DegenerateCloud { distinct: usize },

    /// The filtration grew past the configured simplex budget.
    #[error("filtration exceeded simplex budget of {limit} (reached {reached})")]
    SimplexBudgetExceeded { limit: usize, reached: usize },

    /// The structure loader rejected its input.
    #[error("failed to parse structure {}:{}: {}", .path.display(), .line, .message)]
    StructureParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A numeric argument was out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Fatal configuration error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("r_max must be finite and non-negative, got {0}")]
    InvalidRMax(f64),

    #[error("max_dim must be at most {max}, got {0}", max = crate::config::MAX_HOMOLOGY_DIM)]
    InvalidMaxDim(usize),

    #[error("epsilon must be finite and non-negative, got {0}")]
    InvalidEpsilon(f64),

    #[error("reference thresholds must be finite, non-negative, strictly increasing and distinct to 3 decimals: {0:?}")]
    InvalidReferenceThresholds(Vec<f64>),

    #[error("max_simplices must be positive when set")]
    ZeroSimplexBudget,

    #[error("failed to read configuration {path}: {message}")]
    Load { path: String, message: String },
}

pub type Result<T, E = TdaError> = std::result::Result<T, E>;
