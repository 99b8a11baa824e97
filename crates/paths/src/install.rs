//! Wizard101 installation directories.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

pub const CONFIG_FILE_NAME: &str = "config.xml";
pub const EXECUTABLE_NAME: &str = "WizardGraphicalClient.exe";
pub const WINDOWS_DEFAULT_INSTALL_DIR: &str =
    r"C:\ProgramData\Kingsisle Entertainment\Wizard101\Bin";

const REQUIRED_FILES: [&str; 2] = [CONFIG_FILE_NAME, EXECUTABLE_NAME];

/// A directory that held both `config.xml` and `WizardGraphicalClient.exe`
/// when it was validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationPath {
    dir: PathBuf,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{} is not a Wizard101 installation (missing: {})", dir.display(), missing.join(", "))]
pub struct MissingFiles {
    pub dir: PathBuf,
    pub missing: Vec<&'static str>,
}

impl InstallationPath {
    pub fn validate(dir: impl Into<PathBuf>) -> Result<Self, MissingFiles> {
        let dir = dir.into();
        let missing: Vec<&'static str> = REQUIRED_FILES
            .iter()
            .copied()
            .filter(|name| !dir.join(name).is_file())
            .collect();

        if missing.is_empty() {
            Ok(Self { dir })
        } else {
            Err(MissingFiles { dir, missing })
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    pub fn executable(&self) -> PathBuf {
        self.dir.join(EXECUTABLE_NAME)
    }
}

pub fn is_installation_dir(dir: &Path) -> bool {
    REQUIRED_FILES.iter().all(|name| dir.join(name).is_file())
}

/// The fixed install location of the Windows launcher. Other platforms have
/// no well-known location.
pub fn default_install_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        Some(PathBuf::from(WINDOWS_DEFAULT_INSTALL_DIR))
    } else {
        None
    }
}

pub fn default_scan_root() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\")
    } else {
        PathBuf::from("/")
    }
}

/// Walks `root` top-down and returns the first directory holding both
/// required files. Unreadable directories are skipped. Blocks until the walk
/// finishes or a match is found.
pub fn scan_for_installation(root: &Path) -> Option<InstallationPath> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .find_map(|entry| InstallationPath::validate(entry.path()).ok())
}
