//! Resolution of the data directory holding the two backing files.

use crate::error::{DepotError, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const PRODUCTS_FILE: &str = "products.csv";
pub const MOVEMENTS_FILE: &str = "movements.csv";

/// Locations of the two backing files. Source of truth while the process
/// is down; the repositories own the data while it runs.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub products: PathBuf,
    pub movements: PathBuf,
}

impl DataPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            products: dir.join(PRODUCTS_FILE),
            movements: dir.join(MOVEMENTS_FILE),
        }
    }

    /// Uses `override_dir` when given, otherwise the platform data
    /// directory for this tool.
    pub fn resolve(override_dir: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = override_dir {
            return Ok(Self::in_dir(dir));
        }
        let dirs = ProjectDirs::from("", "", "depot").ok_or_else(|| {
            DepotError::Io(std::io::Error::other("could not determine a data directory"))
        })?;
        Ok(Self::in_dir(dirs.data_dir()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_places_both_files_side_by_side() {
        let paths = DataPaths::in_dir("/tmp/depot-data");
        assert_eq!(paths.products, Path::new("/tmp/depot-data/products.csv"));
        assert_eq!(paths.movements, Path::new("/tmp/depot-data/movements.csv"));
    }

    #[test]
    fn resolve_prefers_the_override() {
        let paths = DataPaths::resolve(Some(PathBuf::from("/tmp/x"))).unwrap();
        assert_eq!(paths.products, Path::new("/tmp/x/products.csv"));
    }
}
