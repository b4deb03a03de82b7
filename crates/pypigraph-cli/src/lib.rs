//! Crawl driver for the pypigraph binary.
//!
//! The driver is the one place that decides "skip and continue" versus
//! "abort": listing the index is the only fatal step, every per-package
//! failure is reported and skipped. The binary in `main.rs` owns exit codes
//! and stdout formatting on top of this.

pub mod crawl;

pub use crawl::{CrawlStats, crawl_index};
