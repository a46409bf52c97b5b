//! Electronic descriptors supplied from outside the crate.
//!
//! λ (electron-phonon coupling) and the ℤ₂ band invariant come from an
//! electronic-structure code. Either may be missing for a material; missing
//! values are carried as [`Descriptor::Unavailable`] so they can never be
//! confused with a measured number.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use log::warn;
use serde::Serialize;

use crate::error::{Result, TdaError};

/// A value that may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Descriptor<T> {
    Available(T),
    Unavailable,
}

impl<T> Descriptor<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Descriptor::Available(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Descriptor::Available(v) => Some(v),
            Descriptor::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for Descriptor<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Descriptor::Unavailable, Descriptor::Available)
    }
}

impl<T: fmt::Display> fmt::Display for Descriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Available(v) => write!(f, "{v}"),
            Descriptor::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Electron-phonon coupling and ℤ₂ invariant of one material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElectronicDescriptors {
    pub lambda: Descriptor<f64>,
    pub z2: Descriptor<i64>,
}

impl ElectronicDescriptors {
    pub fn new(lambda: f64, z2: i64) -> Self {
        Self {
            lambda: Descriptor::Available(lambda),
            z2: Descriptor::Available(z2),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            lambda: Descriptor::Unavailable,
            z2: Descriptor::Unavailable,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.lambda.is_available() && self.z2.is_available()
    }
}

/// Source of electronic descriptors keyed by material identifier.
pub trait DescriptorProvider: Sync {
    /// `None` when the provider knows nothing about the material.
    fn lookup(&self, material_id: &str) -> Option<ElectronicDescriptors>;
}

/// In-memory descriptor table, typically read from `material_id,lambda,Z2` CSV.
#[derive(Debug, Clone, Default)]
pub struct DescriptorTable {
    entries: HashMap<String, ElectronicDescriptors>,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, material_id: impl Into<String>, descriptors: ElectronicDescriptors) {
        self.entries.insert(material_id.into(), descriptors);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read a CSV with a header containing `material_id`, `lambda` and `Z2`
    /// columns. Empty, `unavailable` or unparseable cells become
    /// [`Descriptor::Unavailable`]; only a missing column is an error.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let missing = |name: &str| {
            TdaError::InvalidParameter(format!("descriptor CSV lacks a `{name}` column"))
        };

        let id_col = column("material_id").ok_or_else(|| missing("material_id"))?;
        let lambda_col = column("lambda").ok_or_else(|| missing("lambda"))?;
        let z2_col = column("Z2")
            .or_else(|| column("Z2_invariant"))
            .ok_or_else(|| missing("Z2"))?;

        let mut table = Self::new();
        for record in rdr.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!("skipping unreadable descriptor row: {e}");
                    continue;
                }
            };
            let Some(id) = record.get(id_col).filter(|s| !s.is_empty()) else {
                continue;
            };
            let lambda = parse_cell::<f64>(record.get(lambda_col), "lambda", id);
            let z2 = parse_cell::<i64>(record.get(z2_col), "Z2", id);
            table.insert(id, ElectronicDescriptors { lambda, z2 });
        }
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_csv_reader(std::fs::File::open(path)?)
    }
}

fn parse_cell<T: std::str::FromStr>(cell: Option<&str>, column: &str, id: &str) -> Descriptor<T> {
    match cell {
        None | Some("") => Descriptor::Unavailable,
        Some(s) if s.eq_ignore_ascii_case("unavailable") => Descriptor::Unavailable,
        Some(s) => match s.parse::<T>() {
            Ok(v) => Descriptor::Available(v),
            Err(_) => {
                warn!("{id}: cannot parse {column} value `{s}`, treating it as unavailable");
                Descriptor::Unavailable
            }
        },
    }
}

impl DescriptorProvider for DescriptorTable {
    fn lookup(&self, material_id: &str) -> Option<ElectronicDescriptors> {
        self.entries.get(material_id).copied()
    }
}

impl DescriptorProvider for HashMap<String, ElectronicDescriptors> {
    fn lookup(&self, material_id: &str) -> Option<ElectronicDescriptors> {
        self.get(material_id).copied()
    }
}
