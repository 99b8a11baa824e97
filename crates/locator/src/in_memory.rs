use std::path::{Path, PathBuf};

use crate::errors::StoreError;
use crate::store::PathStore;

/// PathStore kept in memory only. Counts writes so callers can assert that
/// nothing was cached.
#[derive(Debug, Default, Clone)]
pub struct MemoryPathStore {
    pub path: Option<PathBuf>,
    pub saves: usize,
    pub clears: usize,
}

impl MemoryPathStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }
}

impl PathStore for MemoryPathStore {
    fn load(&self) -> Result<Option<PathBuf>, StoreError> {
        Ok(self.path.clone())
    }

    fn save(&mut self, path: &Path) -> Result<(), StoreError> {
        self.path = Some(path.to_path_buf());
        self.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.path = None;
        self.clears += 1;
        Ok(())
    }
}
