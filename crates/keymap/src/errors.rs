use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("{0}")]
    Malformed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Failures while loading `config.xml`.
#[derive(Error, Debug)]
pub enum KeymapError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not well-formed XML: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

/// Failures while writing `config.xml` back. The document on disk is left
/// as it was.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is in use by another program; close Wizard101 and try again", path.display())]
    Locked { path: PathBuf },

    #[error("could not serialize document: {0}")]
    Serialize(#[from] XmlError),
}
