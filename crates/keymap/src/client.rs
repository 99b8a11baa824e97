use std::path::{Path, PathBuf};

use paths::InstallationPath;
use tracing::info;

use crate::errors::{KeymapError, XmlError};
use crate::record::{collect_records, InputRecord};
use crate::xml::XmlDocument;

/// A loaded `config.xml`: the full document plus the editable records found
/// in it. This is the only owner of the document tree.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) path: PathBuf,
    pub(crate) document: XmlDocument,
    pub(crate) records: Vec<InputRecord>,
}

impl ClientConfig {
    pub fn load(install: &InstallationPath) -> Result<Self, KeymapError> {
        Self::open(install.config_file())
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self, KeymapError> {
        let path = path.into();
        let bytes = std::fs::read(&path).map_err(|source| KeymapError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(path, &bytes)?;
        info!(
            path = %config.path.display(),
            records = config.records.len(),
            "loaded client config"
        );
        Ok(config)
    }

    pub fn parse(path: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self, KeymapError> {
        let path = path.into();
        let document = XmlDocument::parse(bytes).map_err(|e| KeymapError::Malformed {
            path: path.clone(),
            message: match e {
                XmlError::Malformed(message) => message,
                other => other.to_string(),
            },
        })?;
        let records = collect_records(&document);
        Ok(Self {
            path,
            document,
            records,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &XmlDocument {
        &self.document
    }

    pub fn records(&self) -> &[InputRecord] {
        &self.records
    }

    /// First record whose label matches. Records without an `Event` answer
    /// to [`UNKNOWN_EVENT`](crate::UNKNOWN_EVENT).
    pub fn record(&self, event: &str) -> Option<&InputRecord> {
        self.records.iter().find(|r| r.label() == event)
    }
}
