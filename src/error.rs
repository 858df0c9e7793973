use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop an operation outright.
#[derive(Error, Debug)]
pub enum MapperError {
    #[error("project root does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("project root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid memory slot name: {0:?}")]
    InvalidSlot(String),

    #[error("malformed graph document: {0}")]
    MalformedGraph(String),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl MapperError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MapperError>;

/// Non-fatal condition collected while a run keeps going.
///
/// Paths are project-relative, `/`-separated.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    #[error("skipped unreadable directory {path}: {message}")]
    UnreadableDirectory { path: String, message: String },

    #[error("skipped entry {path}: {message}")]
    UnreadableEntry { path: String, message: String },

    #[error("could not read {path}, recorded without imports: {message}")]
    UnreadableFile { path: String, message: String },

    #[error("time budget exhausted after {files_collected} files, graph is partial")]
    TraversalInterrupted { files_collected: usize },
}
