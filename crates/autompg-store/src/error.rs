use std::path::PathBuf;

use thiserror::Error;

/// Fatal load errors. Malformed lines are not errors at this level: they are
/// skipped and counted in the load report.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("data source not found: {} (download disabled)", .0.display())]
    SourceNotFound(PathBuf),

    #[error("download from {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
