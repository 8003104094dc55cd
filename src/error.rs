use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing fixture files
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("html rewrite failed: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),

    #[error("failed to write report: {0}")]
    Report(#[source] std::io::Error),

    #[error("row {row} has {len} fields, field {needed} is required")]
    ShortRow { row: usize, len: usize, needed: usize },
}

impl FixtureError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, FixtureError>;
