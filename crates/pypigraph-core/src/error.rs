//! Errors shared across the pypigraph crates.

use thiserror::Error;

/// Errors produced by the core HTTP and archive layers.
///
/// The variants split along the lines callers care about: transport failures
/// ([`Http`](CoreError::Http), [`Status`](CoreError::Status)) mean the remote
/// end could not be read; decode failures ([`Archive`](CoreError::Archive),
/// [`Zip`](CoreError::Zip)) mean the bytes arrived but were not a valid
/// archive; [`NoMatch`](CoreError::NoMatch) means the archive was scanned
/// cleanly end to end and simply contained no entry of interest. The crawl
/// driver skips-and-logs on `NoMatch` but surfaces everything else.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Network-level failure issuing a request or reading its body.
    #[error("request failed for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server responded with a non-success status code.
    #[error("HTTP {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Decompression or tar parsing failed.
    #[error("failed to read archive: {source}")]
    Archive {
        #[source]
        source: std::io::Error,
    },

    /// Zip central directory or entry parsing failed.
    #[error("failed to read zip archive: {source}")]
    Zip {
        #[source]
        source: zip::result::ZipError,
    },

    /// A full archive scan completed without any entry matching the pattern.
    #[error("no archive entry matched pattern {pattern}")]
    NoMatch { pattern: String },

    /// I/O error outside the archive decode path.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A spawned extraction task panicked or was cancelled.
    #[error("archive task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Helper for wrapping a `reqwest` error with the URL it came from.
    pub fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.into(),
            source,
        }
    }

    /// Helper for wrapping a tar/gzip read error.
    pub fn archive(source: std::io::Error) -> Self {
        Self::Archive { source }
    }

    /// Helper for wrapping a zip read error.
    pub fn zip(source: zip::result::ZipError) -> Self {
        Self::Zip { source }
    }

    /// Returns `true` for the "scanned cleanly, nothing matched" outcome.
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }
}
