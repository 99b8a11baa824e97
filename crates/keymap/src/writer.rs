//! Writing edits back into `config.xml`.
//!
//! A save clears the file's read-only flag, applies every buffer of the
//! session to the document, writes the whole tree once to a temporary
//! sibling and renames it over the original. The read-only flag is put back
//! afterwards whether or not the write succeeded.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info, warn};

use crate::client::ClientConfig;
use crate::errors::SaveError;
use crate::record::{collect_records, Modifier};
use crate::session::EditSession;

/// What happens to the read-only flag once a save is done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProtectionPolicy {
    /// Leave the flag the way it was found.
    #[default]
    Restore,
    /// Always leave the file read-only so the client cannot overwrite the
    /// bindings.
    LockAfterSave,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// Session entries that found a matching record.
    pub records_updated: usize,
    pub bytes_written: usize,
    pub read_only: bool,
}

impl ClientConfig {
    /// Copies every buffer of `session` into the first record with the same
    /// label, the key the session was built with. Only fields that already
    /// exist are touched.
    pub fn apply_edits(&mut self, session: &EditSession) -> usize {
        let mut updated = 0;
        for (event, state) in session.iter() {
            let Some(record) = self.records.iter().find(|r| r.label() == event) else {
                debug!(event, "no record to update");
                continue;
            };
            let Some(element) = self.document.root_mut().element_at_mut(record.handle()) else {
                warn!(event, "record handle no longer resolves");
                continue;
            };

            if let Some(key) = element.child_mut("Key") {
                key.set_text(&state.key);
            }
            for m in Modifier::ALL {
                if let Some(field) = element.child_mut(m.tag()) {
                    field.set_text(if state.modifier(m) { "1" } else { "0" });
                }
            }
            updated += 1;
        }
        self.records = collect_records(&self.document);
        updated
    }

    /// Applies `session` and writes the document to disk.
    pub fn save(
        &mut self,
        session: &EditSession,
        policy: ProtectionPolicy,
    ) -> Result<SaveReport, SaveError> {
        let path = self.path.clone();
        let was_read_only = is_read_only(&path).map_err(|source| SaveError::Io {
            path: path.clone(),
            source,
        })?;
        let mut guard = Protection {
            path: &path,
            restore_to: match policy {
                ProtectionPolicy::Restore => was_read_only,
                ProtectionPolicy::LockAfterSave => true,
            },
            restored: false,
        };
        if was_read_only {
            set_read_only(&path, false).map_err(|source| SaveError::Io {
                path: path.clone(),
                source,
            })?;
        }

        let records_updated = self.apply_edits(session);
        let bytes = self.document.to_bytes()?;
        replace_contents(&path, &bytes)?;

        let read_only = guard.restore();
        info!(
            path = %path.display(),
            records_updated,
            bytes = bytes.len(),
            read_only,
            "saved client config"
        );
        Ok(SaveReport {
            records_updated,
            bytes_written: bytes.len(),
            read_only,
        })
    }
}

/// Puts the read-only flag back when dropped.
struct Protection<'a> {
    path: &'a Path,
    restore_to: bool,
    restored: bool,
}

impl Protection<'_> {
    /// Restores now and reports the flag's final state.
    fn restore(&mut self) -> bool {
        self.apply();
        self.restored = true;
        is_read_only(self.path).unwrap_or(self.restore_to)
    }

    fn apply(&self) {
        if let Err(e) = set_read_only(self.path, self.restore_to) {
            warn!(path = %self.path.display(), error = %e, "could not restore read-only flag");
        }
    }
}

impl Drop for Protection<'_> {
    fn drop(&mut self) {
        if !self.restored {
            self.apply();
        }
    }
}

pub fn is_read_only(path: &Path) -> io::Result<bool> {
    Ok(fs::metadata(path)?.permissions().readonly())
}

/// Sets or clears write protection. On Unix only the write bits are touched;
/// clearing restores the owner's write bit.
pub fn set_read_only(path: &Path, read_only: bool) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    if perms.readonly() == read_only {
        return Ok(());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = perms.mode();
        perms.set_mode(if read_only { mode & !0o222 } else { mode | 0o200 });
    }
    #[cfg(not(unix))]
    perms.set_readonly(read_only);
    fs::set_permissions(path, perms)
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("config.xml"));
    name.push(suffix);
    path.with_file_name(name)
}

/// Writes `bytes` to a temporary sibling and renames it over `path`.
///
/// The whole write-and-rename runs under an exclusive lock on a separate
/// `.lock` sibling. The rename swaps out `path` itself, so locking it would
/// exclude nothing. The lock only keeps out writers that take the same lock,
/// such as a second editor; the game client does not look at it.
fn replace_contents(path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    let io_err = |source: io::Error| SaveError::Io {
        path: path.to_path_buf(),
        source,
    };

    let lock = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(sibling(path, ".lock"))
        .map_err(io_err)?;
    if let Err(e) = lock.try_lock_exclusive() {
        return Err(
            if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                SaveError::Locked {
                    path: path.to_path_buf(),
                }
            } else {
                io_err(e)
            },
        );
    }
    let perms = fs::metadata(path).map_err(io_err)?.permissions();

    let tmp = sibling(path, ".tmp");
    let replaced = (|| -> io::Result<()> {
        let mut f = File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
        drop(f);
        fs::set_permissions(&tmp, perms)?;
        fs::rename(&tmp, path)
    })();
    if let Err(e) = replaced {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(e));
    }

    #[cfg(unix)]
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        File::open(dir).and_then(|d| d.sync_all()).map_err(io_err)?;
    }
    lock.unlock().map_err(io_err)
}
