use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::errors::StoreError;

/// Single-slot storage for the resolved installation directory.
pub trait PathStore {
    /// Returns the stored path, or `None` when nothing (or only whitespace)
    /// is stored.
    fn load(&self) -> Result<Option<PathBuf>, StoreError>;

    /// Replaces whatever was stored before.
    fn save(&mut self, path: &Path) -> Result<(), StoreError>;

    fn clear(&mut self) -> Result<(), StoreError>;
}

/// One-line plain text file, `wizard101_path.txt` by default.
///
/// Writes go to a temporary sibling that is renamed into place. Saving and
/// clearing hold an advisory lock on a `.lock` sibling, which survives the
/// rename, so concurrent editors take turns.
#[derive(Debug, Clone)]
pub struct FilePathStore {
    path: PathBuf,
}

impl FilePathStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn with_lock<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce() -> io::Result<R>,
    {
        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(|e| self.io_err(e))?;
        lock.lock_exclusive().map_err(|e| self.io_err(e))?;
        let res = f();
        lock.unlock().map_err(|e| self.io_err(e))?;
        res.map_err(|e| self.io_err(e))
    }
}

impl PathStore for FilePathStore {
    fn load(&self) -> Result<Option<PathBuf>, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(PathBuf::from(trimmed)))
        }
    }

    fn save(&mut self, path: &Path) -> Result<(), StoreError> {
        let line = path
            .to_str()
            .ok_or_else(|| StoreError::NonUtf8(path.to_path_buf()))?
            .to_owned();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let tmp = self.path.with_extension("tmp");
        self.with_lock(|| {
            let mut f = File::create(&tmp)?;
            f.write_all(line.as_bytes())?;
            f.sync_all()?;
            drop(f);
            std::fs::rename(&tmp, &self.path).inspect_err(|_| {
                let _ = std::fs::remove_file(&tmp);
            })
        })?;
        tracing::debug!(cache = %self.path.display(), "cached installation path");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.with_lock(|| match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            res => res,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_loads_as_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FilePathStore::new(tmp.path().join("wizard101_path.txt"));

        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn blank_file_loads_as_none() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("wizard101_path.txt");
        std::fs::write(&file, "  \n").unwrap();

        assert_eq!(FilePathStore::new(file).load().unwrap(), None);
    }

    #[test]
    fn load_trims_surrounding_whitespace() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("wizard101_path.txt");
        std::fs::write(&file, "  D:\\Games\\Wizard101\\Bin\r\n").unwrap();

        assert_eq!(
            FilePathStore::new(file).load().unwrap(),
            Some(PathBuf::from("D:\\Games\\Wizard101\\Bin"))
        );
    }

    #[test]
    fn save_overwrites_previous_value() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("wizard101_path.txt");
        let mut store = FilePathStore::new(&file);

        store.save(Path::new("/first/long/path/Bin")).unwrap();
        store.save(Path::new("/second")).unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "/second");
        assert_eq!(store.load().unwrap(), Some(PathBuf::from("/second")));
        assert!(!file.with_extension("tmp").exists());
    }

    #[test]
    fn save_waits_for_the_lock_holder() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("wizard101_path.txt");
        let mut store = FilePathStore::new(&file);
        store.save(Path::new("/first")).unwrap();

        let holder = File::open(store.lock_path()).unwrap();
        holder.lock_exclusive().unwrap();
        let writer = std::thread::spawn(move || store.save(Path::new("/second")));

        std::thread::sleep(std::time::Duration::from_millis(100));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "/first");

        holder.unlock().unwrap();
        writer.join().unwrap().unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "/second");
    }

    #[test]
    fn save_creates_parent_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FilePathStore::new(tmp.path().join("nested/dir/cache.txt"));

        store.save(Path::new("/games/w101")).unwrap();
        assert_eq!(store.load().unwrap(), Some(PathBuf::from("/games/w101")));
    }

    #[test]
    fn clear_removes_entry_and_tolerates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FilePathStore::new(tmp.path().join("wizard101_path.txt"));

        store.clear().unwrap();
        store.save(Path::new("/games/w101")).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
