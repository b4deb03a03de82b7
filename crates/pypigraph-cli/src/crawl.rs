//! The crawl loop.

use pypigraph_graph::DependencyGraph;
use pypigraph_index::{PackageIndex, Result};

/// Outcome counts for one crawl run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Packages recorded in the graph, with or without dependencies.
    pub crawled: usize,
    /// Packages excluded entirely by per-package errors.
    pub skipped: usize,
}

/// Crawls every package on `index` into `graph`.
///
/// Packages are processed one at a time; there is no shared state between
/// iterations, and the graph is mutated only from this task. A package whose
/// requirements extract cleanly contributes one edge per requirement; a
/// package with an expected absence (no files, no source distribution, no
/// requirements file) is still recorded as a known, dependency-free node. A
/// package that errors is logged and excluded entirely — never with a
/// partial requirement list.
///
/// # Errors
///
/// Only a failure to list the packages themselves aborts the crawl; nothing
/// discovered after that point can.
pub async fn crawl_index(index: &PackageIndex, graph: &mut DependencyGraph) -> Result<CrawlStats> {
    let packages = index.all_packages().await?;
    tracing::info!(count = packages.len(), index = index.base_uri(), "listed packages");

    let mut stats = CrawlStats::default();
    for pkg in &packages {
        match index.package_requirements(pkg).await {
            Ok(Some(requirements)) => {
                graph.add_package(pkg);
                for requirement in &requirements {
                    graph.add_edge(pkg, &requirement.name);
                }
                stats.crawled += 1;
            }
            Ok(None) => {
                // Absence cause already logged where it was detected.
                graph.add_package(pkg);
                stats.crawled += 1;
            }
            Err(e) => {
                tracing::error!(package = %pkg, error = %e, "skipping package");
                stats.skipped += 1;
            }
        }
    }

    tracing::info!(crawled = stats.crawled, skipped = stats.skipped, "crawl finished");
    Ok(stats)
}
