use std::path::PathBuf;

use thiserror::Error;

use crate::db::StoreError;


#[derive(Error, Debug)]
pub enum PurgeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cannot read list file {}: {source}", .path.display())]
    ListFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PurgeError {
    pub fn list_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ListFile {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PurgeError>;
