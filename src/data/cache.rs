use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::error::LoadError;
use super::loader::load_file;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Load-once dataset shared by every session of the process
// ---------------------------------------------------------------------------

/// Read-through cache around [`load_file`].
///
/// The first successful `get` parses the file; every later call hands out
/// the same `Arc`. A failed load stores nothing, so the next call retries.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    cell: OnceCell<Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DatasetCache {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Result<Arc<Dataset>, LoadError> {
        self.cell
            .get_or_try_init(|| load_file(&self.path).map(Arc::new))
            .cloned()
    }

    /// Whether the dataset has already been loaded.
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "REGION,COUNTRY,SOURCES,SEGMENT,REASON,EMISSION (KT)\n\
                       Europe,France,Energy,Gas,Vented,4\n";

    #[test]
    fn loads_once_and_shares() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, CSV).unwrap();

        let cache = DatasetCache::new(&path);
        assert!(!cache.is_loaded());
        let first = cache.get().unwrap();

        // Later reads never touch the file again.
        std::fs::remove_file(&path).unwrap();
        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn failure_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");

        let cache = DatasetCache::new(&path);
        assert!(matches!(cache.get(), Err(LoadError::NotFound(_))));
        assert!(!cache.is_loaded());

        std::fs::write(&path, CSV).unwrap();
        assert_eq!(cache.get().unwrap().len(), 1);
    }
}
