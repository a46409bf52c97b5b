//! Per-material pipeline and the batch driver.
//!
//! ```text
//! PointCloud ─► merge coincident ─► VietorisRips ─► compute_persistence ─► Summarizer
//!                                                                              │
//!                                         DescriptorProvider ─► MaterialRecord ┘
//! ```
//!
//! Materials are independent; the batch maps them in parallel and folds the
//! ordered results into a [`ComparisonTable`]. A failure is recorded against
//! its material and never stops the others.

use std::fmt;
use std::path::Path;

use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;

use super::descriptors::{DescriptorProvider, ElectronicDescriptors};
use super::table::{ComparisonTable, MaterialFailure, MaterialRecord};
use crate::cloud::{PointCloud, StructureLoader};
use crate::config::AnalysisConfig;
use crate::error::{ConfigError, Result};
use crate::summary::{Summarizer, TopologicalSummary};
use crate::topology::{compute_persistence, PersistenceDiagram, VietorisRips};

/// Non-fatal condition recorded against a material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AnalysisWarning {
    /// Points closer than epsilon were found; `merged` tells whether they
    /// were collapsed before the filtration was built.
    NumericDegeneracy { collisions: usize, merged: bool },
    /// The descriptor provider had no data, or only part of it.
    DescriptorsUnavailable,
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::NumericDegeneracy { collisions, merged: true } => {
                write!(f, "{collisions} near-coincident pair(s) merged at threshold 0")
            }
            AnalysisWarning::NumericDegeneracy { collisions, merged: false } => {
                write!(f, "{collisions} near-coincident pair(s) left unmerged")
            }
            AnalysisWarning::DescriptorsUnavailable => {
                write!(f, "electronic descriptors unavailable")
            }
        }
    }
}

/// Full topological result for one material.
#[derive(Debug, Clone)]
pub struct MaterialAnalysis {
    pub material_id: String,
    pub diagram: PersistenceDiagram,
    pub summary: TopologicalSummary,
    /// Points that entered the filtration after merging
    pub n_points: usize,
    /// Simplices in the filtration
    pub n_simplices: usize,
    pub warnings: Vec<AnalysisWarning>,
}

/// One material handed to the batch. Loader failures travel with it so they
/// are reported in order with everything else.
#[derive(Debug)]
pub struct MaterialInput {
    pub material_id: String,
    pub cloud: Result<PointCloud>,
}

impl MaterialInput {
    pub fn new(material_id: impl Into<String>, cloud: PointCloud) -> Self {
        Self {
            material_id: material_id.into(),
            cloud: Ok(cloud),
        }
    }

    pub fn load<L: StructureLoader + ?Sized>(loader: &L, path: &Path) -> Self {
        Self {
            material_id: loader.material_id(path),
            cloud: loader.load(path),
        }
    }
}

/// Filtration, persistence and summary for a single cloud.
pub fn analyze_cloud(
    material_id: &str,
    cloud: &PointCloud,
    config: &AnalysisConfig,
) -> Result<MaterialAnalysis> {
    let mut warnings = Vec::new();

    let merge = cloud.merge_coincident(config.epsilon);
    let working = if merge.collisions > 0 {
        warnings.push(AnalysisWarning::NumericDegeneracy {
            collisions: merge.collisions,
            merged: config.merge_coincident,
        });
        if config.merge_coincident {
            warn!(
                "{material_id}: merged {} point(s) closer than {:e}",
                merge.merged_points(),
                config.epsilon
            );
            &merge.cloud
        } else {
            warn!(
                "{material_id}: {} point pair(s) closer than {:e} left unmerged",
                merge.collisions, config.epsilon
            );
            cloud
        }
    } else {
        cloud
    };

    let filtration = VietorisRips::from_config(config, working).build(working)?;
    let diagram = compute_persistence(&filtration);
    let summary = Summarizer::from_config(config).summarize(&diagram);

    debug!(
        "{material_id}: {} points, {} simplices, {} persistence pairs",
        working.len(),
        filtration.len(),
        diagram.len()
    );

    Ok(MaterialAnalysis {
        material_id: material_id.to_string(),
        n_points: working.len(),
        n_simplices: filtration.len(),
        diagram,
        summary,
        warnings,
    })
}

/// Descriptors for a material, warning when any are missing.
fn resolve_descriptors<P>(
    material_id: &str,
    provider: &P,
    warnings: &mut Vec<AnalysisWarning>,
) -> ElectronicDescriptors
where
    P: DescriptorProvider + ?Sized,
{
    match provider.lookup(material_id) {
        Some(descriptors) if descriptors.is_complete() => descriptors,
        Some(descriptors) => {
            warn!(
                "{material_id}: electronic descriptors incomplete (lambda: {}, Z2: {})",
                descriptors.lambda, descriptors.z2
            );
            warnings.push(AnalysisWarning::DescriptorsUnavailable);
            descriptors
        }
        None => {
            warn!("{material_id}: no electronic descriptors, reporting topology only");
            warnings.push(AnalysisWarning::DescriptorsUnavailable);
            ElectronicDescriptors::unavailable()
        }
    }
}

fn run_material<P>(
    input: MaterialInput,
    config: &AnalysisConfig,
    provider: &P,
) -> std::result::Result<MaterialRecord, MaterialFailure>
where
    P: DescriptorProvider + ?Sized,
{
    let MaterialInput { material_id, cloud } = input;
    let analysis = cloud.and_then(|cloud| analyze_cloud(&material_id, &cloud, config));

    match analysis {
        Ok(analysis) => {
            let mut warnings = analysis.warnings;
            let electronic = resolve_descriptors(&material_id, provider, &mut warnings);
            Ok(MaterialRecord {
                material_id,
                summary: analysis.summary,
                electronic,
                warnings,
            })
        }
        Err(error) => {
            warn!("{material_id}: analysis failed: {error}");
            Err(MaterialFailure { material_id, error })
        }
    }
}

/// Analyse every material and assemble the comparison table.
///
/// Rows follow input order whatever order the workers finish in. Only an
/// invalid configuration makes this return an error.
pub fn analyze_batch<P>(
    inputs: Vec<MaterialInput>,
    config: &AnalysisConfig,
    provider: &P,
) -> std::result::Result<ComparisonTable, ConfigError>
where
    P: DescriptorProvider + ?Sized,
{
    config.validate()?;

    let run = |input: MaterialInput| run_material(input, config, provider);
    let outcomes: Vec<_> = if config.parallel {
        inputs.into_par_iter().map(&run).collect()
    } else {
        inputs.into_iter().map(&run).collect()
    };

    Ok(ComparisonTable::from_outcomes(outcomes))
}
