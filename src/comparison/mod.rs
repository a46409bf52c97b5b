//! Comparison Module: Benchmarking Materials Side by Side
//!
//! Pairs each material's topological summary with its externally computed
//! electronic descriptors (λ, ℤ₂) and collects the rows, in input order, into
//! a [`ComparisonTable`] that can be written as CSV.

mod descriptors;
mod pipeline;
mod table;

pub use descriptors::{Descriptor, DescriptorProvider, DescriptorTable, ElectronicDescriptors};
pub use pipeline::{analyze_batch, analyze_cloud, AnalysisWarning, MaterialAnalysis, MaterialInput};
pub use table::{
    format_significant, ComparisonTable, MaterialFailure, MaterialRecord, SIGNIFICANT_DIGITS,
};
