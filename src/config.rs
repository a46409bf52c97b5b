//! Analysis configuration.
//!
//! Every option has a default so an empty YAML/JSON document is a valid
//! configuration. Values are checked by [`AnalysisConfig::validate`] before a
//! batch starts; a bad value here is the only thing that aborts a whole run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cloud::PointCloud;
use crate::error::ConfigError;
use crate::summary::betti_metric_name;

/// Highest homology dimension a configuration may ask for.
pub const MAX_HOMOLOGY_DIM: usize = 8;

/// Configuration for the per-material topology pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum filtration threshold. `None` uses the cloud's bounding diagonal,
    /// which every pairwise distance is below.
    pub r_max: Option<f64>,
    /// Highest homology dimension reported (simplices go one dimension higher).
    pub max_dim: usize,
    /// Points closer than this are treated as the same atom.
    pub epsilon: f64,
    /// Scales (Å) at which Betti numbers are reported.
    pub reference_thresholds: Vec<f64>,
    /// Merge near-coincident points before filtration. When false, collisions
    /// are only reported.
    pub merge_coincident: bool,
    /// Abort a material whose filtration would exceed this many simplices.
    pub max_simplices: Option<usize>,
    /// Analyse materials on the rayon thread pool.
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            r_max: None,
            max_dim: 2,
            epsilon: 1e-6,
            reference_thresholds: vec![1.5, 2.5, 3.5],
            merge_coincident: true,
            max_simplices: Some(2_000_000),
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file, then validate.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let load_err = |message: String| ConfigError::Load {
            path: path.display().to_string(),
            message,
        };
        let text = fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&text).map_err(|e| load_err(e.to_string()))?,
            _ => serde_yaml::from_str(&text).map_err(|e| load_err(e.to_string()))?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(r) = self.r_max {
            if !r.is_finite() || r < 0.0 {
                return Err(ConfigError::InvalidRMax(r));
            }
        }
        if self.max_dim > MAX_HOMOLOGY_DIM {
            return Err(ConfigError::InvalidMaxDim(self.max_dim));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ConfigError::InvalidEpsilon(self.epsilon));
        }
        let thresholds = &self.reference_thresholds;
        let well_formed = thresholds.iter().all(|r| r.is_finite() && *r >= 0.0)
            && thresholds.windows(2).all(|w| w[0] < w[1])
            && thresholds
                .windows(2)
                .all(|w| betti_metric_name(0, w[0]) != betti_metric_name(0, w[1]));
        if !well_formed {
            return Err(ConfigError::InvalidReferenceThresholds(thresholds.clone()));
        }
        if self.max_simplices == Some(0) {
            return Err(ConfigError::ZeroSimplexBudget);
        }
        Ok(())
    }

    /// Filtration ceiling for a particular cloud.
    pub fn resolve_r_max(&self, cloud: &PointCloud) -> f64 {
        self.r_max.unwrap_or_else(|| cloud.bounding_diagonal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_dim, 2);
        assert_eq!(config.epsilon, 1e-6);
    }

    #[test]
    fn test_negative_r_max_rejected() {
        let config = AnalysisConfig { r_max: Some(-1.0), ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::InvalidRMax(-1.0)));
    }

    #[test]
    fn test_unsorted_thresholds_rejected() {
        let config = AnalysisConfig {
            reference_thresholds: vec![2.0, 1.0],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidReferenceThresholds(_))
        ));
    }

    #[test]
    fn test_thresholds_sharing_a_column_name_rejected() {
        let config = AnalysisConfig {
            reference_thresholds: vec![0.9999, 1.0001],
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidReferenceThresholds(vec![0.9999, 1.0001]))
        );
    }

    #[test]
    fn test_max_dim_bounded() {
        let config = AnalysisConfig { max_dim: usize::MAX, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::InvalidMaxDim(usize::MAX)));

        let config = AnalysisConfig { max_dim: MAX_HOMOLOGY_DIM, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: AnalysisConfig =
            serde_yaml::from_str("max_dim: 1\nreference_thresholds: [1.0, 2.0]\n").unwrap();
        assert_eq!(config.max_dim, 1);
        assert_eq!(config.reference_thresholds, vec![1.0, 2.0]);
        assert!(config.merge_coincident);
        assert_eq!(config.r_max, None);
    }

    #[test]
    fn test_from_path_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        fs::write(&path, r#"{"r_max": 4.0, "epsilon": 0.001}"#).unwrap();
        let config = AnalysisConfig::from_path(&path).unwrap();
        assert_eq!(config.r_max, Some(4.0));
        assert_eq!(config.epsilon, 0.001);
    }
}
