//! Comparison table: one row per analysed material.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::descriptors::ElectronicDescriptors;
use super::pipeline::AnalysisWarning;
use crate::error::{Result, TdaError};
use crate::summary::TopologicalSummary;

/// Significant digits of every numeric CSV field.
pub const SIGNIFICANT_DIGITS: usize = 6;

/// Topological summary and electronic descriptors of one material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialRecord {
    pub material_id: String,
    pub summary: TopologicalSummary,
    pub electronic: ElectronicDescriptors,
    /// Non-fatal problems met while analysing this material.
    pub warnings: Vec<AnalysisWarning>,
}

/// A material whose pipeline failed.
#[derive(Debug)]
pub struct MaterialFailure {
    pub material_id: String,
    pub error: TdaError,
}

/// Ordered records plus the materials that could not be analysed.
#[derive(Debug, Default)]
pub struct ComparisonTable {
    records: Vec<MaterialRecord>,
    failures: Vec<MaterialFailure>,
}

impl ComparisonTable {
    /// Fold ordered per-material outcomes into a table.
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = std::result::Result<MaterialRecord, MaterialFailure>>,
    {
        outcomes.into_iter().fold(Self::default(), |mut table, outcome| {
            match outcome {
                Ok(record) => table.records.push(record),
                Err(failure) => table.failures.push(failure),
            }
            table
        })
    }

    pub fn records(&self) -> &[MaterialRecord] {
        &self.records
    }

    pub fn failures(&self) -> &[MaterialFailure] {
        &self.failures
    }

    pub fn get(&self, material_id: &str) -> Option<&MaterialRecord> {
        self.records.iter().find(|r| r.material_id == material_id)
    }

    /// Sorted union of every metric name across records.
    pub fn metric_columns(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self.records.iter().flat_map(|r| r.summary.names()).collect();
        names.into_iter().map(str::to_string).collect()
    }

    /// Full header: `material_id`, metrics, `lambda`, `Z2_invariant`.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec!["material_id".to_string()];
        columns.extend(self.metric_columns());
        columns.push("lambda".to_string());
        columns.push("Z2_invariant".to_string());
        columns
    }

    /// Write the table as CSV with a header row.
    ///
    /// Metrics a material lacks are left empty; missing descriptors are
    /// written as `unavailable`.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<()> {
        let metrics = self.metric_columns();
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(self.columns())?;

        for record in &self.records {
            let mut row = Vec::with_capacity(metrics.len() + 3);
            row.push(record.material_id.clone());
            for name in &metrics {
                row.push(record.summary.get(name).map(format_significant).unwrap_or_default());
            }
            row.push(
                record
                    .electronic
                    .lambda
                    .value()
                    .map_or_else(|| "unavailable".to_string(), |v| format_significant(*v)),
            );
            row.push(record.electronic.z2.to_string());
            wtr.write_record(&row)?;
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn write_csv_path(&self, path: &Path) -> Result<()> {
        self.write_csv(std::fs::File::create(path)?)
    }
}

/// Format with [`SIGNIFICANT_DIGITS`] significant digits, `%g` style.
pub fn format_significant(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".into()
        } else if value > 0.0 {
            "inf".into()
        } else {
            "-inf".into()
        };
    }

    let exponent = value.abs().log10().floor() as i32;
    let sig = SIGNIFICANT_DIGITS as i32;
    if exponent < -4 || exponent >= sig {
        return format!("{:.*e}", (sig - 1) as usize, value);
    }

    let decimals = (sig - 1 - exponent).max(0) as usize;
    let fixed = format!("{value:.decimals$}");
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::Summarizer;
    use crate::topology::{PersistenceDiagram, PersistencePair};

    fn record(id: &str, electronic: ElectronicDescriptors) -> MaterialRecord {
        let pd = PersistenceDiagram::from_pairs(
            1,
            vec![PersistencePair::new(0, 0.0, 2.0_f64.sqrt()), PersistencePair::essential(0, 0.0)],
        );
        MaterialRecord {
            material_id: id.to_string(),
            summary: Summarizer::new(vec![1.0], 1).summarize(&pd),
            electronic,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(2.0_f64.sqrt()), "1.41421");
        assert_eq!(format_significant(3.0), "3");
        assert_eq!(format_significant(0.5), "0.5");
        assert_eq!(format_significant(1234.56789), "1234.57");
        assert_eq!(format_significant(0.0001234567), "0.000123457");
        assert_eq!(format_significant(1.5e-7), "1.50000e-7");
        assert_eq!(format_significant(0.0), "0");
    }

    #[test]
    fn test_outcome_order_preserved() {
        let table = ComparisonTable::from_outcomes(vec![
            Ok(record("YBCO", ElectronicDescriptors::new(1.2, 0))),
            Err(MaterialFailure {
                material_id: "empty".to_string(),
                error: TdaError::EmptyStructure,
            }),
            Ok(record("LK99", ElectronicDescriptors::unavailable())),
        ]);
        let ids: Vec<_> = table.records().iter().map(|r| r.material_id.as_str()).collect();
        assert_eq!(ids, vec!["YBCO", "LK99"]);
        assert_eq!(table.failures().len(), 1);
    }

    #[test]
    fn test_csv_output() {
        let table = ComparisonTable::from_outcomes(vec![
            Ok(record("YBCO", ElectronicDescriptors::new(1.2, 0))),
            Ok(record("LK99", ElectronicDescriptors::unavailable())),
        ]);

        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("material_id,betti0_r1.000,"));
        assert!(lines[0].ends_with(",lambda,Z2_invariant"));
        assert!(lines[1].starts_with("YBCO,2,"));
        assert!(lines[1].ends_with(",1.2,0"));
        assert!(lines[2].ends_with(",unavailable,unavailable"));
        assert!(lines[1].contains("1.41421"));
    }
}
