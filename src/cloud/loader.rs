//! Structure loading.
//!
//! Crystallographic parsing lives outside this crate; [`StructureLoader`] is
//! the seam where an external parser plugs in. [`XyzLoader`] reads the plain
//! XYZ format (atom count, comment line, then `Element x y z` rows) that most
//! structure tools can export.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cloud::PointCloud;
use crate::error::{Result, TdaError};

/// Turns a structure file into a point cloud.
pub trait StructureLoader: Sync {
    fn load(&self, path: &Path) -> Result<PointCloud>;

    /// Material identifier derived from a path: the file stem.
    fn material_id(&self, path: &Path) -> String {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string()
    }
}

/// Reader for XYZ files.
#[derive(Debug, Clone, Copy, Default)]
pub struct XyzLoader;

impl XyzLoader {
    pub fn parse(&self, path: &Path, text: &str) -> Result<PointCloud> {
        let parse_err = |line: usize, message: String| TdaError::StructureParse {
            path: PathBuf::from(path),
            line,
            message,
        };

        let mut lines = text.lines().enumerate();
        let declared: usize = match lines.next() {
            Some((_, header)) => {
                let header = header.trim();
                header
                    .parse()
                    .map_err(|_| parse_err(1, format!("expected atom count, found `{header}`")))?
            }
            None => return Err(TdaError::EmptyStructure),
        };
        // Comment line.
        lines.next();

        let mut sites = Vec::with_capacity(declared);
        for (idx, line) in lines {
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            if fields.len() < 4 {
                let message = format!("expected `Element x y z`, found `{trimmed}`");
                return Err(parse_err(line_no, message));
            }
            let mut position = [0.0; 3];
            for (d, field) in fields[1..4].iter().enumerate() {
                position[d] = field
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| parse_err(line_no, format!("invalid coordinate `{field}`")))?;
            }
            sites.push((position, fields[0].to_string()));
        }

        if sites.len() != declared {
            return Err(parse_err(
                1,
                format!("header declares {declared} atoms but {} were read", sites.len()),
            ));
        }
        PointCloud::from_sites(sites)
    }
}

impl StructureLoader for XyzLoader {
    fn load(&self, path: &Path) -> Result<PointCloud> {
        let text = fs::read_to_string(path)?;
        self.parse(path, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEROVSKITE: &str = "\
5
SrTiO3 cubic cell
Sr 0.0 0.0 0.0
Ti 1.95 1.95 1.95
O  1.95 1.95 0.0
O  1.95 0.0  1.95
O  0.0  1.95 1.95
";

    #[test]
    fn test_parse_xyz() {
        let cloud = XyzLoader.parse(Path::new("SrTiO3.xyz"), PEROVSKITE).unwrap();
        assert_eq!(cloud.len(), 5);
        assert_eq!(cloud.species(1), "Ti");
        assert_eq!(cloud.position(1), [1.95, 1.95, 1.95]);
        assert_eq!(cloud.species_counts()["O"], 3);
    }

    #[test]
    fn test_bad_coordinate_reports_line() {
        let text = "1\ncomment\nCu 0.0 abc 0.0\n";
        match XyzLoader.parse(Path::new("bad.xyz"), text) {
            Err(TdaError::StructureParse { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_count_mismatch() {
        let text = "3\ncomment\nCu 0 0 0\n";
        assert!(matches!(
            XyzLoader.parse(Path::new("short.xyz"), text),
            Err(TdaError::StructureParse { .. })
        ));
    }

    #[test]
    fn test_zero_atoms_is_empty_structure() {
        let text = "0\nempty\n";
        assert!(matches!(
            XyzLoader.parse(Path::new("empty.xyz"), text),
            Err(TdaError::EmptyStructure)
        ));
    }

    #[test]
    fn test_material_id_from_stem() {
        assert_eq!(XyzLoader.material_id(Path::new("data/LK99.xyz")), "LK99");
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SrTiO3.xyz");
        fs::write(&path, PEROVSKITE).unwrap();
        assert_eq!(XyzLoader.load(&path).unwrap().len(), 5);
    }
}
