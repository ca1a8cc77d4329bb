#![forbid(unsafe_code)]

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PakError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cannot open input file(s): {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("no match for {}", .0.display())]
    NotFound(PathBuf),

    #[error("routing conflict: {0}")]
    RoutingConflict(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("io: {}: {source}", path.display())]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid packed file: {0}")]
    Invalid(String),

    #[error("compression requested but pakker was built without zstd feature")]
    NoZstd,
}

impl PakError {
    pub(crate) fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PakError::IoAt {
            path: path.into(),
            source,
        }
    }
}

pub type PakResult<T> = Result<T, PakError>;
