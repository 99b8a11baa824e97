//! Path handling for the keybinding editor.
//!
//! Two concerns live here: [`PathContext`] knows where the tool keeps its own
//! files (path cache, logs), and [`install`] knows what a Wizard101
//! installation directory looks like and how to find one.

pub mod install;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use install::{
    default_install_dir, default_scan_root, is_installation_dir, scan_for_installation,
    InstallationPath, MissingFiles, CONFIG_FILE_NAME, EXECUTABLE_NAME,
    WINDOWS_DEFAULT_INSTALL_DIR,
};

/// Default name of the plain-text file remembering the installation directory.
pub const PATH_CACHE_FILE_NAME: &str = "wizard101_path.txt";

/// Identifies the runtime environment where the application is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    /// Running via `cargo run` or in development mode
    Development,
    /// Running as an installed binary in production
    Production,
}

/// Locations of the files the editor itself owns.
#[derive(Debug, Clone)]
pub struct PathContext {
    environment: RuntimeEnvironment,
    /// Base path for logs
    base_path: Arc<Path>,
    /// Directory relative paths (the path cache) are resolved against
    working_dir: Arc<Path>,
    app_id: &'static str,
}

impl PathContext {
    /// Creates a new PathContext with automatic environment detection.
    pub fn new(app_id: &'static str) -> Self {
        let environment = Self::detect_environment();
        let base_path = Self::determine_base_path(environment, app_id);
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Self {
            environment,
            base_path: base_path.into(),
            working_dir: working_dir.into(),
            app_id,
        }
    }

    /// Creates a PathContext with explicit directories (useful for testing).
    pub fn with_base_path(base_path: PathBuf, working_dir: PathBuf, app_id: &'static str) -> Self {
        Self {
            environment: Self::detect_environment(),
            base_path: base_path.into(),
            working_dir: working_dir.into(),
            app_id,
        }
    }

    fn detect_environment() -> RuntimeEnvironment {
        if let Ok(exe_path) = std::env::current_exe() {
            // target/debug or target/release
            if exe_path.components().any(|c| c.as_os_str() == "target") {
                return RuntimeEnvironment::Development;
            }
        }

        if std::env::var("CARGO").is_ok() || std::env::var("CARGO_MANIFEST_DIR").is_ok() {
            return RuntimeEnvironment::Development;
        }

        RuntimeEnvironment::Production
    }

    fn determine_base_path(environment: RuntimeEnvironment, app_id: &str) -> PathBuf {
        match environment {
            RuntimeEnvironment::Development => {
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            }
            RuntimeEnvironment::Production => dirs::data_local_dir()
                .map(|dir| dir.join(app_id))
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn app_id(&self) -> &str {
        self.app_id
    }

    /// Resolves the path cache file. Relative names are taken relative to the
    /// working directory, absolute ones are used as given.
    pub fn path_cache_file(&self, name: Option<&Path>) -> PathBuf {
        let name = name.unwrap_or_else(|| Path::new(PATH_CACHE_FILE_NAME));
        if name.is_absolute() {
            name.to_path_buf()
        } else {
            self.working_dir.join(name)
        }
    }

    /// `<base>/logs/`
    pub fn logs_dir(&self) -> PathBuf {
        self.base_path.join("logs")
    }

    /// `<base>/logs/<app_id>.<timestamp>.log`
    pub fn log_file(&self, timestamp: &str) -> PathBuf {
        self.logs_dir()
            .join(format!("{}.{}.log", self.app_id, timestamp))
    }

    /// Returns a log file path with current timestamp.
    pub fn log_file_now(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        self.log_file(&timestamp)
    }

    /// Ensures all necessary directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        let dir = self.logs_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}
