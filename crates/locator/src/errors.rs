use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path is not valid UTF-8: {0:?}")]
    NonUtf8(PathBuf),
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Config path not found.")]
    NotFound,

    #[error("user interaction failed: {0}")]
    Interaction(#[from] std::io::Error),
}
