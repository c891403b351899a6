//! Catalog persistence
//!
//! A store is read once before an import run and written once after it. The
//! JSON store replaces the file atomically, so a failed commit leaves the
//! previous catalog exactly as it was.
//!
//! Author: hephaex@gmail.com

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use guia_core::{GuiaError, RestaurantRecord, Result};
use tempfile::NamedTempFile;

use crate::Catalog;

/// Trait for catalog backends
pub trait CatalogStore: Send + Sync {
    /// Read the current catalog
    fn load(&self) -> Result<Catalog>;

    /// Replace the stored catalog as a single all-or-nothing step
    fn commit(&self, catalog: &Catalog) -> Result<()>;
}

// ============================================================================
// JSON File Store
// ============================================================================

/// Catalog kept as a pretty-printed JSON array of records
#[derive(Debug, Clone)]
pub struct JsonCatalogStore {
    path: PathBuf,
}

impl JsonCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persistence_error(&self, reason: impl ToString) -> GuiaError {
        GuiaError::PersistenceFailed {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl CatalogStore for JsonCatalogStore {
    fn load(&self) -> Result<Catalog> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No catalog file yet, starting empty");
                return Ok(Catalog::new());
            }
            Err(e) => return Err(e.into()),
        };

        if text.trim().is_empty() {
            return Ok(Catalog::new());
        }

        let records: Vec<RestaurantRecord> = serde_json::from_str(&text).map_err(|e| {
            GuiaError::CatalogCorrupted(format!("{}: {e}", self.path.display()))
        })?;

        let catalog = Catalog::from_records(records)?;
        tracing::debug!(path = %self.path.display(), records = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    fn commit(&self, catalog: &Catalog) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Same directory as the target so the final rename stays on one filesystem
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.persistence_error(e))?;

        serde_json::to_writer_pretty(&mut tmp, catalog.records())
            .map_err(|e| self.persistence_error(e))?;
        tmp.write_all(b"\n")
            .map_err(|e| self.persistence_error(e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| self.persistence_error(e))?;

        tmp.persist(&self.path)
            .map_err(|e| self.persistence_error(e.error))?;

        tracing::info!(path = %self.path.display(), records = catalog.len(), "Catalog committed");
        Ok(())
    }
}

// ============================================================================
// In-Memory Store
// ============================================================================

/// Store holding the catalog in memory, for tests and previews
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    catalog: Mutex<Catalog>,
    commits: Mutex<usize>,
    fail_commits: bool,
}

impl MemoryCatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Mutex::new(catalog),
            ..Default::default()
        }
    }

    /// A store whose every commit fails with `PersistenceFailed`
    pub fn failing(catalog: Catalog) -> Self {
        Self {
            fail_commits: true,
            ..Self::new(catalog)
        }
    }

    /// Number of successful commits
    pub fn commit_count(&self) -> usize {
        *self.commits.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of the stored catalog
    pub fn snapshot(&self) -> Catalog {
        self.catalog.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn load(&self) -> Result<Catalog> {
        Ok(self.snapshot())
    }

    fn commit(&self, catalog: &Catalog) -> Result<()> {
        if self.fail_commits {
            return Err(GuiaError::PersistenceFailed {
                path: "<memory>".to_string(),
                reason: "commits disabled".to_string(),
            });
        }

        *self.catalog.lock().unwrap_or_else(|e| e.into_inner()) = catalog.clone();
        *self.commits.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use guia_core::{PriceLevel, TriState};
    use tempfile::tempdir;

    fn sample_catalog() -> Catalog {
        let mut momokuri = RestaurantRecord::new("Momokuri", "Pinheiros");
        momokuri.cuisine = vec!["japonesa".to_string()];
        momokuri.price_level = Some(PriceLevel::Upscale);
        momokuri.accepts_voucher = TriState::No;

        Catalog::from_records(vec![
            momokuri,
            RestaurantRecord::new("Cantina São Benedito", "Pinheiros"),
        ])
        .unwrap()
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonCatalogStore::new(dir.path().join("catalog.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_commit_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let store = JsonCatalogStore::new(&path);

        let catalog = sample_catalog();
        store.commit(&catalog).unwrap();
        assert_eq!(store.load().unwrap(), catalog);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"price_level\": \"$$$\""));
        assert!(text.contains("\"accessibility\": null"));
        assert!(text.contains("São Benedito"));

        // Only the target remains in the directory
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_tolerates_missing_optional_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"name": "Jojo Ramen", "neighborhood": "Pinheiros", "price_level": "$$"}]"#,
        )
        .unwrap();

        let catalog = JsonCatalogStore::new(&path).load().unwrap();
        let jojo = catalog.get("jojo ramen").unwrap();
        assert_eq!(jojo.price_level, Some(PriceLevel::Moderate));
        assert_eq!(jojo.accepts_voucher, TriState::Unknown);
        assert!(jojo.cuisine.is_empty());
    }

    #[test]
    fn test_invalid_files_are_corrupted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let store = JsonCatalogStore::new(&path);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(store.load(), Err(GuiaError::CatalogCorrupted(_))));

        std::fs::write(&path, r#"[{"name": "Momokuri", "neighborhood": "Pinheiros", "price_level": "$$$$"}]"#).unwrap();
        assert!(matches!(store.load(), Err(GuiaError::CatalogCorrupted(_))));

        std::fs::write(
            &path,
            r#"[{"name": "Momokuri", "neighborhood": "Pinheiros"},
                {"name": "momokuri", "neighborhood": "Pinheiros"}]"#,
        )
        .unwrap();
        assert!(matches!(store.load(), Err(GuiaError::CatalogCorrupted(_))));
    }

    #[test]
    fn test_failed_commit_leaves_previous_state() {
        let dir = tempdir().unwrap();

        // Missing parent directory
        let store = JsonCatalogStore::new(dir.path().join("missing").join("catalog.json"));
        assert!(matches!(
            store.commit(&sample_catalog()),
            Err(GuiaError::PersistenceFailed { .. })
        ));

        // Target is a directory, so the final rename fails
        let target = dir.path().join("catalog.json");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep.txt"), "untouched").unwrap();

        let store = JsonCatalogStore::new(&target);
        assert!(matches!(
            store.commit(&sample_catalog()),
            Err(GuiaError::PersistenceFailed { .. })
        ));
        assert_eq!(
            std::fs::read_to_string(target.join("keep.txt")).unwrap(),
            "untouched"
        );
        // No temp file left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCatalogStore::new(Catalog::new());
        store.commit(&sample_catalog()).unwrap();
        assert_eq!(store.load().unwrap().len(), 2);
        assert_eq!(store.commit_count(), 1);

        let failing = MemoryCatalogStore::failing(sample_catalog());
        assert!(failing.commit(&Catalog::new()).is_err());
        assert_eq!(failing.load().unwrap().len(), 2);
        assert_eq!(failing.commit_count(), 0);
    }
}
