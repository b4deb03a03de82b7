//! Flat line-oriented snapshot encoding.
//!
//! The on-disk format is one line per fact: `PACKAGE:DEPENDENCY` for an
//! edge, a bare `PACKAGE` for a known package with no declared dependencies.
//! Lines are independent; packages are emitted in sorted order so the same
//! graph always encodes to the same bytes. A line with more than one `:` is
//! skipped with a warning — the original format never produces one, so its
//! presence is data corruption worth logging, but not worth refusing an
//! otherwise-usable snapshot over.

use crate::error::{GraphError, Result};
use crate::graph::DependencyGraph;
use std::path::Path;

impl DependencyGraph {
    /// Encodes the graph to the flat snapshot format.
    ///
    /// Every graph this crate can produce round-trips losslessly through
    /// [`decode`](DependencyGraph::decode): per-package dependency order is
    /// preserved exactly, and the edge multiset is preserved overall.
    pub fn encode(&self) -> String {
        let mut packages: Vec<&String> = self.requires.keys().collect();
        packages.sort();

        let mut out = String::new();
        for pkg in packages {
            let deps = &self.requires[pkg];
            if deps.is_empty() {
                out.push_str(pkg);
                out.push('\n');
            } else {
                for dep in deps {
                    out.push_str(pkg);
                    out.push(':');
                    out.push_str(dep);
                    out.push('\n');
                }
            }
        }
        out
    }

    /// Decodes a snapshot produced by [`encode`](DependencyGraph::encode).
    ///
    /// Empty lines are ignored; malformed lines (more than one `:`) are
    /// skipped with a warning. Keys are re-normalized on the way in, so a
    /// snapshot written by an older normalizer still loads consistently.
    pub fn decode(input: &str) -> Self {
        let mut graph = Self::new();
        for line in input.lines() {
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split(':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(pkg), Some(dep), None) => graph.add_edge(pkg, dep),
                (Some(pkg), None, None) => graph.add_package(pkg),
                _ => tracing::warn!(line, "skipping malformed snapshot line"),
            }
        }
        graph
    }

    /// Loads a snapshot from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Read`] if the file cannot be read. There is no
    /// panicking default-location variant of this; callers own the path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| GraphError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::decode(&contents))
    }

    /// Writes the encoded snapshot to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.encode()).map_err(|source| GraphError::Write {
            path: path.display().to_string(),
            source,
        })
    }
}
