//! Error types raised by the content layer.

use std::path::PathBuf;

use coven_schema::SchemaError;
use thiserror::Error;

/// Errors surfaced by document sources and loaders.
///
/// Every variant is fatal at loader construction. After construction only
/// `reload_if_changed` can hit these again, and there they are logged and
/// swallowed — the previous snapshot stays in service.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Validation(#[from] SchemaError),
}

pub type Result<T> = std::result::Result<T, ContentError>;
