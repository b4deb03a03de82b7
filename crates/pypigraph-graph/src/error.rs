//! Errors for graph snapshot I/O.

use thiserror::Error;

/// Errors that can occur loading or saving a graph snapshot.
#[derive(Error, Debug)]
pub enum GraphError {
    /// Failed to read a snapshot file.
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a snapshot file.
    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the graph crate.
pub type Result<T> = std::result::Result<T, GraphError>;
