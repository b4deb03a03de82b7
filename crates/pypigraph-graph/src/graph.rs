//! Graph construction and queries.

use pypigraph_core::normalize_package_name;
use std::collections::HashMap;

/// Two symmetric adjacency mappings over normalized package names.
///
/// `add_edge` keeps the mappings mirror images of each other: an edge
/// `pkg → dep` appears in `requires[pkg]` exactly as many times as `pkg`
/// appears in `required_by[dep]`. Duplicates are permitted and source order
/// is preserved — a requirements file that names the same dependency twice
/// produces two edges.
///
/// Every package the graph has ever been told about, including pure
/// dependencies and packages with zero dependencies, has entries in both
/// mappings, so "known but dependency-free" is representable. Queries for
/// unknown packages return an empty slice rather than an error; use
/// [`contains`](DependencyGraph::contains) when the difference matters.
///
/// # Examples
///
/// ```
/// use pypigraph_graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
/// graph.add_edge("alpha", "beta");
/// graph.add_package("loner");
///
/// assert_eq!(graph.requires("alpha"), ["beta"]);
/// assert_eq!(graph.required_by("beta"), ["alpha"]);
/// assert!(graph.requires("loner").is_empty());
/// assert!(graph.contains("loner"));
/// assert!(!graph.contains("stranger"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub(crate) requires: HashMap<String, Vec<String>>,
    pub(crate) required_by: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `pkg`'s latest source distribution declares `dep`.
    ///
    /// Both names are normalized. Beyond the two directed entries, the
    /// mirror slots (`requires[dep]`, `required_by[pkg]`) are created empty
    /// if absent, so every mentioned package is queryable in both
    /// directions.
    pub fn add_edge(&mut self, pkg: &str, dep: &str) {
        let pkg = normalize_package_name(pkg);
        let dep = normalize_package_name(dep);

        self.requires.entry(pkg.clone()).or_default().push(dep.clone());
        self.required_by.entry(dep.clone()).or_default().push(pkg.clone());

        self.requires.entry(dep).or_default();
        self.required_by.entry(pkg).or_default();
    }

    /// Ensures both slots exist for a package that declares no dependencies.
    pub fn add_package(&mut self, pkg: &str) {
        let pkg = normalize_package_name(pkg);
        self.requires.entry(pkg.clone()).or_default();
        self.required_by.entry(pkg).or_default();
    }

    /// The packages `pkg` requires, in declaration order.
    ///
    /// `pkg` is normalized before lookup; an unknown package yields an empty
    /// slice.
    pub fn requires(&self, pkg: &str) -> &[String] {
        self.requires
            .get(&normalize_package_name(pkg))
            .map_or(&[], Vec::as_slice)
    }

    /// The packages that require `pkg`.
    pub fn required_by(&self, pkg: &str) -> &[String] {
        self.required_by
            .get(&normalize_package_name(pkg))
            .map_or(&[], Vec::as_slice)
    }

    /// Whether the graph knows `pkg` at all — distinguishes "unknown" from
    /// "known, zero dependencies", which the lookups deliberately conflate.
    pub fn contains(&self, pkg: &str) -> bool {
        self.requires.contains_key(&normalize_package_name(pkg))
    }

    /// Number of known packages.
    pub fn len(&self) -> usize {
        self.requires.len()
    }

    /// Whether the graph knows no packages.
    pub fn is_empty(&self) -> bool {
        self.requires.is_empty()
    }

    /// Iterates over known package names, in no particular order.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.requires.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_symmetric() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("alpha", "beta");
        graph.add_edge("alpha", "gamma");
        graph.add_edge("delta", "beta");

        assert_eq!(graph.requires("alpha"), ["beta", "gamma"]);
        assert_eq!(graph.required_by("beta"), ["alpha", "delta"]);
        assert_eq!(graph.required_by("gamma"), ["alpha"]);
    }

    #[test]
    fn test_add_edge_creates_mirror_slots() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("alpha", "beta");

        // beta never declared anything, alpha is required by nothing, yet
        // both are known in both directions.
        assert!(graph.contains("beta"));
        assert!(graph.requires("beta").is_empty());
        assert!(graph.required_by("alpha").is_empty());
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_duplicate_edges_preserve_multiplicity() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("alpha", "beta");
        graph.add_edge("alpha", "beta");

        assert_eq!(graph.requires("alpha"), ["beta", "beta"]);
        assert_eq!(graph.required_by("beta"), ["alpha", "alpha"]);
    }

    #[test]
    fn test_multiplicity_symmetry_over_random_edges() {
        let mut graph = DependencyGraph::new();
        let edges = [
            ("a", "b"),
            ("a", "b"),
            ("b", "c"),
            ("c", "a"),
            ("a", "c"),
            ("b", "c"),
        ];
        for (pkg, dep) in edges {
            graph.add_edge(pkg, dep);
        }

        let count = |haystack: &[String], needle: &str| {
            haystack.iter().filter(|x| *x == needle).count()
        };
        for pkg in ["a", "b", "c"] {
            for dep in ["a", "b", "c"] {
                assert_eq!(
                    count(graph.requires(pkg), dep),
                    count(graph.required_by(dep), pkg),
                    "edge multiplicity {pkg} -> {dep}"
                );
            }
        }
    }

    #[test]
    fn test_lookup_normalizes() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("Django_CMS", "Django");

        assert_eq!(graph.requires("django-cms"), ["django"]);
        assert_eq!(graph.required_by("DJANGO"), ["django-cms"]);
        assert!(graph.contains("django.cms"));
    }

    #[test]
    fn test_unknown_package_is_empty_not_error() {
        let graph = DependencyGraph::new();
        assert!(graph.requires("ghost").is_empty());
        assert!(graph.required_by("ghost").is_empty());
        assert!(!graph.contains("ghost"));
    }

    #[test]
    fn test_add_package_idempotent_with_edges() {
        let mut graph = DependencyGraph::new();
        graph.add_package("alpha");
        graph.add_edge("alpha", "beta");
        graph.add_package("alpha");

        assert_eq!(graph.requires("alpha"), ["beta"]);
        assert_eq!(graph.len(), 2);
    }
}
