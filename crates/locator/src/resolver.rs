use std::io;
use std::path::{Path, PathBuf};

use paths::{scan_for_installation, InstallationPath};
use tracing::{debug, info, warn};

use crate::errors::ResolveError;
use crate::store::PathStore;

/// The user-facing half of resolution. The terminal wizard implements it with
/// popups; tests script it.
pub trait Prompter {
    /// "Would you like to manually select the Wizard101 folder?"
    fn confirm_manual_selection(&mut self) -> io::Result<bool>;

    /// `None` when the user cancels.
    fn pick_directory(&mut self) -> io::Result<Option<PathBuf>>;

    fn scan_started(&mut self, root: &Path) -> io::Result<()>;

    /// Waits for the user to acknowledge the end of the scan.
    fn scan_finished(&mut self, found: Option<&Path>) -> io::Result<()>;

    fn report_not_found(&mut self) -> io::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Directory given on the command line. Never falls through.
    pub explicit_dir: Option<PathBuf>,
    pub default_dir: Option<PathBuf>,
    pub scan_root: PathBuf,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            explicit_dir: None,
            default_dir: paths::default_install_dir(),
            scan_root: paths::default_scan_root(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedFrom {
    Explicit,
    Default,
    Cache,
    Manual,
    Scan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub install: InstallationPath,
    pub source: ResolvedFrom,
}

/// Finds the installation directory. The first step that yields a valid
/// directory wins:
///
/// 1. `explicit_dir`, if given (fails outright when invalid)
/// 2. `default_dir`
/// 3. the cached path, re-validated; a stale entry is cleared
/// 4. a manual pick, or a full scan of `scan_root` when the user declines
///
/// Paths found in steps 1 and 4 are written to `store`. On failure the user
/// is told and nothing is cached.
pub fn resolve_installation(
    opts: &ResolverOptions,
    store: &mut dyn PathStore,
    prompter: &mut dyn Prompter,
) -> Result<Resolved, ResolveError> {
    if let Some(dir) = &opts.explicit_dir {
        return match InstallationPath::validate(dir) {
            Ok(install) => {
                remember(store, &install);
                Ok(found(install, ResolvedFrom::Explicit))
            }
            Err(e) => {
                warn!(error = %e, "explicit installation directory rejected");
                Err(ResolveError::NotFound)
            }
        };
    }

    if let Some(install) = opts
        .default_dir
        .as_ref()
        .and_then(|dir| InstallationPath::validate(dir).ok())
    {
        return Ok(found(install, ResolvedFrom::Default));
    }

    if let Some(install) = cached(store) {
        return Ok(found(install, ResolvedFrom::Cache));
    }

    let install = if prompter.confirm_manual_selection()? {
        prompter
            .pick_directory()?
            .and_then(|dir| match InstallationPath::validate(&dir) {
                Ok(install) => Some(install),
                Err(e) => {
                    info!(error = %e, "selected directory rejected");
                    None
                }
            })
            .map(|install| (install, ResolvedFrom::Manual))
    } else {
        prompter.scan_started(&opts.scan_root)?;
        info!(root = %opts.scan_root.display(), "scanning for installation");
        let hit = scan_for_installation(&opts.scan_root);
        prompter.scan_finished(hit.as_ref().map(InstallationPath::dir))?;
        hit.map(|install| (install, ResolvedFrom::Scan))
    };

    match install {
        Some((install, source)) => {
            remember(store, &install);
            Ok(found(install, source))
        }
        None => {
            prompter.report_not_found()?;
            Err(ResolveError::NotFound)
        }
    }
}

fn found(install: InstallationPath, source: ResolvedFrom) -> Resolved {
    info!(dir = %install.dir().display(), ?source, "installation resolved");
    Resolved { install, source }
}

fn cached(store: &mut dyn PathStore) -> Option<InstallationPath> {
    let dir = match store.load() {
        Ok(dir) => dir?,
        Err(e) => {
            warn!(error = %e, "could not read cached path");
            return None;
        }
    };

    match InstallationPath::validate(&dir) {
        Ok(install) => Some(install),
        Err(e) => {
            warn!(error = %e, "discarding stale cached path");
            if let Err(e) = store.clear() {
                warn!(error = %e, "could not clear cached path");
            }
            None
        }
    }
}

fn remember(store: &mut dyn PathStore, install: &InstallationPath) {
    match store.save(install.dir()) {
        Ok(()) => debug!("installation path cached"),
        Err(e) => warn!(error = %e, "could not cache installation path"),
    }
}
