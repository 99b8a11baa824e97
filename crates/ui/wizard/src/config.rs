use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use keymap::ProtectionPolicy;
use lazy_static::lazy_static;
use locator::ResolverOptions;
use paths::PATH_CACHE_FILE_NAME;
use serde::Deserialize;
use tracing::debug;

use crate::cli::Cli;

/// Settings, layered: built-in defaults, then `config.toml` (or the file
/// passed with `--config`), then `W101_KEYS_*` environment variables.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Checked before the cache; the Windows default is used when unset.
    #[serde(default)]
    pub default_install_dir: Option<PathBuf>,
    #[serde(default)]
    pub scan_root: Option<PathBuf>,
    /// Relative paths are taken from the working directory.
    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,
    #[serde(default)]
    pub lock_after_save: bool,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    /// `EnvFilter` directive, e.g. `debug` or `keymap=trace`.
    #[serde(default)]
    pub log_level: Option<String>,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase();
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

fn default_cache_file() -> PathBuf {
    PathBuf::from(PATH_CACHE_FILE_NAME)
}

fn default_tick_rate_ms() -> u64 {
    250
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_install_dir: None,
            scan_root: None,
            cache_file: default_cache_file(),
            lock_after_save: false,
            tick_rate_ms: default_tick_rate_ms(),
            log_level: None,
        }
    }
}

impl Config {
    /// `file` must exist when given; the default `config.toml` is optional.
    pub fn new(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("cache_file", PATH_CACHE_FILE_NAME)?
            .set_default("tick_rate_ms", default_tick_rate_ms() as i64)?
            .set_default("lock_after_save", false)?;

        builder = match file {
            Some(path) => builder.add_source(
                config::File::from(path.to_path_buf())
                    .format(config::FileFormat::Toml)
                    .required(true),
            ),
            None => {
                let path = get_config_dir().join("config.toml");
                debug!(path = %path.display(), exists = path.exists(), "config file");
                builder.add_source(
                    config::File::from(path)
                        .format(config::FileFormat::Toml)
                        .required(false),
                )
            }
        };

        builder
            .add_source(config::Environment::with_prefix(&PROJECT_NAME).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Command-line flags win over every other layer.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(root) = &cli.scan_root {
            self.scan_root = Some(root.clone());
        }
        self.lock_after_save |= cli.lock_after_save;
        self
    }

    pub fn resolver_options(&self, explicit_dir: Option<PathBuf>) -> ResolverOptions {
        let defaults = ResolverOptions::default();
        ResolverOptions {
            explicit_dir,
            default_dir: self.default_install_dir.clone().or(defaults.default_dir),
            scan_root: self.scan_root.clone().unwrap_or(defaults.scan_root),
        }
    }

    pub fn protection(&self) -> ProtectionPolicy {
        if self.lock_after_save {
            ProtectionPolicy::LockAfterSave
        } else {
            ProtectionPolicy::Restore
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(10))
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(dir) = CONFIG_FOLDER.clone() {
        dir
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "w101-keys", env!("CARGO_PKG_NAME"))
}
