//! Package index crawling for pypigraph.
//!
//! This crate turns a PyPI-style "simple" index into structured requirement
//! data:
//!
//! - [`PackageIndex`] lists packages and per-package file candidates from the
//!   index's HTML listing pages, selects the latest source distribution, and
//!   pulls `requires.txt` out of it without materializing the archive.
//! - [`Requirement`] is the parsed form of one requirement line
//!   (`name[extra]op version`), with an exact, anchored grammar — a line that
//!   does not match in full is a parse error, never a best-effort extraction.
//! - [`resolve_source_repo`] maps a package to its canonical source-control
//!   repository URI via a regex cascade over its `PKG-INFO` metadata plus a
//!   static override table.
//!
//! Per-package failures are the caller's to handle: every fallible operation
//! here returns a `Result`, and the absence outcomes a crawl expects (no
//! files, no sdist, no requires.txt) are `Ok(None)`, not errors.

pub mod crawler;
pub mod error;
pub mod repo;
pub mod requirement;

pub use crawler::{DEFAULT_INDEX_URI, PackageIndex, latest_sdist};
pub use error::{IndexError, Result};
pub use repo::resolve_source_repo;
pub use requirement::{ConstraintOp, Requirement, VersionConstraint};
