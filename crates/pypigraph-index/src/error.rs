//! Errors specific to index crawling and repository resolution.

use pypigraph_core::CoreError;
use thiserror::Error;

/// Errors that can occur while crawling a package index.
#[derive(Error, Debug)]
pub enum IndexError {
    /// Transport or archive failure from the core layer.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A listing page did not match the expected exact shape.
    ///
    /// The listing format is assumed uniform, so a single anomaly means the
    /// page format changed and the whole listing is untrustworthy.
    #[error("unexpected package listing format: {detail}")]
    ListingFormat { detail: String },

    /// A requirement line did not match the grammar in full.
    #[error("unable to parse requirement from {line:?}")]
    RequirementParse { line: String },

    /// No source distribution exists for a package whose metadata was asked for.
    #[error("no source distribution found for {package}")]
    NoSourceArtifact { package: String },

    /// Metadata had a homepage, but no recognized repository host matched it.
    #[error("could not parse repository URI from homepage: {homepage}")]
    UnparseableHomepage { homepage: String },

    /// Metadata had no homepage line at all; carries the raw metadata for triage.
    #[error("no homepage found in metadata: {metadata}")]
    NoHomepage { metadata: String },
}

/// Convenience alias used throughout the index crate.
pub type Result<T> = std::result::Result<T, IndexError>;
