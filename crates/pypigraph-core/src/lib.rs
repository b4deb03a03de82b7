//! Core infrastructure for pypigraph.
//!
//! This crate provides the pieces shared by the crawler, the repository
//! resolver, and the dependency graph:
//!
//! - **HTTP client**: a thin [`HttpClient`] wrapper around `reqwest` with a
//!   fixed user agent and request timeout, offering full-body and streaming
//!   reads.
//! - **Archive extraction**: [`fetch_matching`] pulls the concatenated bytes
//!   of every entry matching a pattern out of a remote `.tar.gz` or `.zip`
//!   archive. The tar path streams; the zip path buffers (zip's central
//!   directory lives at the end of the file).
//! - **Name normalization**: [`normalize_package_name`] canonicalizes package
//!   names per PEP 503. All graph identity comparisons go through it.
//! - **Error types**: [`CoreError`] distinguishes transport failures from
//!   decode failures from the "archive scanned cleanly but nothing matched"
//!   outcome, because callers treat those very differently.

pub mod archive;
pub mod error;
pub mod http;
pub mod normalize;

pub use archive::{ArchiveKind, fetch_matching};
pub use error::{CoreError, Result};
pub use http::HttpClient;
pub use normalize::normalize_package_name;
