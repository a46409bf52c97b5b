use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::topology::PersistenceDiagram;

/// Named scalar metrics for one material, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopologicalSummary {
    metrics: BTreeMap<String, f64>,
}

impl TopologicalSummary {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.metrics.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    fn insert(&mut self, name: String, value: f64) {
        self.metrics.insert(name, value);
    }
}

/// Column name for βₖ at scale `r`.
pub fn betti_metric_name(dim: usize, r: f64) -> String {
    format!("betti{dim}_r{r:.3}")
}

/// Pure reduction of a diagram into a [`TopologicalSummary`].
#[derive(Debug, Clone)]
pub struct Summarizer {
    reference_thresholds: Vec<f64>,
    max_dim: usize,
}

impl Summarizer {
    pub fn new(reference_thresholds: Vec<f64>, max_dim: usize) -> Self {
        Self {
            reference_thresholds,
            max_dim,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.reference_thresholds.clone(), config.max_dim)
    }

    pub fn summarize(&self, pd: &PersistenceDiagram) -> TopologicalSummary {
        let mut summary = TopologicalSummary::default();

        for d in 0..=self.max_dim {
            for &r in &self.reference_thresholds {
                summary.insert(betti_metric_name(d, r), pd.betti_at(d, r) as f64);
            }
            summary.insert(format!("total_persistence_dim{d}"), pd.total_persistence(d));
            summary.insert(format!("max_lifetime_dim{d}"), pd.max_lifetime(d));
            summary.insert(format!("persistence_entropy_dim{d}"), pd.persistence_entropy(d));
            summary.insert(format!("feature_count_dim{d}"), pd.feature_count(d) as f64);
            summary.insert(format!("essential_count_dim{d}"), pd.essential(d).len() as f64);
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::PersistencePair;

    #[test]
    fn test_summary_of_square_like_diagram() {
        let s2 = 2.0_f64.sqrt();
        let pd = PersistenceDiagram::from_pairs(
            1,
            vec![
                PersistencePair::new(0, 0.0, 1.0),
                PersistencePair::new(0, 0.0, 1.0),
                PersistencePair::new(0, 0.0, 1.0),
                PersistencePair::essential(0, 0.0),
                PersistencePair::new(1, 1.0, s2),
                PersistencePair::new(1, s2, s2),
            ],
        );

        let summary = Summarizer::new(vec![0.5, 1.2], 1).summarize(&pd);
        assert_eq!(summary.get("betti0_r0.500"), Some(4.0));
        assert_eq!(summary.get("betti0_r1.200"), Some(1.0));
        assert_eq!(summary.get("betti1_r1.200"), Some(1.0));
        assert_eq!(summary.get("feature_count_dim1"), Some(1.0));
        assert_eq!(summary.get("essential_count_dim0"), Some(1.0));
        assert!((summary.get("max_lifetime_dim1").unwrap() - (s2 - 1.0)).abs() < 1e-12);
        assert_eq!(summary.get("total_persistence_dim0"), Some(3.0));
    }

    #[test]
    fn test_empty_dimension_reports_zero() {
        let pd = PersistenceDiagram::from_pairs(2, vec![PersistencePair::essential(0, 0.0)]);
        let summary = Summarizer::new(vec![], 2).summarize(&pd);
        assert_eq!(summary.get("total_persistence_dim2"), Some(0.0));
        assert_eq!(summary.get("max_lifetime_dim1"), Some(0.0));
        assert_eq!(summary.get("persistence_entropy_dim1"), Some(0.0));
    }

    #[test]
    fn test_names_are_sorted() {
        let pd = PersistenceDiagram::new(1);
        let summary = Summarizer::new(vec![1.0], 1).summarize(&pd);
        let names: Vec<&str> = summary.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert_eq!(summary.len(), 2 * 6);
    }
}
