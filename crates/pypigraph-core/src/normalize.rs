//! Package-name normalization.
//!
//! The dependency graph keys every package by its normalized name: the
//! persisted snapshot stores normalized keys, and every query normalizes its
//! argument before lookup, so `Flask`, `flask` and `FLASK` are the same graph
//! entity.

/// Normalize a package name according to PEP 503.
///
/// Converts the name to lowercase and replaces underscores/dots with hyphens,
/// then collapses consecutive separators. This ensures consistent package
/// lookups regardless of how the name is written.
///
/// # Examples
///
/// ```
/// # use pypigraph_core::normalize_package_name;
/// assert_eq!(normalize_package_name("Flask"), "flask");
/// assert_eq!(normalize_package_name("django_rest_framework"), "django-rest-framework");
/// assert_eq!(normalize_package_name("zope.interface"), "zope-interface");
/// assert_eq!(normalize_package_name("my__package"), "my-package");
/// ```
pub fn normalize_package_name(name: &str) -> String {
    name.to_lowercase()
        .replace(['_', '.'], "-")
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases() {
        assert_eq!(normalize_package_name("Django"), "django");
        assert_eq!(normalize_package_name("PyYAML"), "pyyaml");
    }

    #[test]
    fn test_separators_unified() {
        assert_eq!(normalize_package_name("repoze.lru"), "repoze-lru");
        assert_eq!(normalize_package_name("python_dateutil"), "python-dateutil");
        assert_eq!(normalize_package_name("a.b_c-d"), "a-b-c-d");
    }

    #[test]
    fn test_consecutive_separators_collapse() {
        assert_eq!(normalize_package_name("a--b"), "a-b");
        assert_eq!(normalize_package_name("a._-b"), "a-b");
    }

    #[test]
    fn test_already_normalized_is_identity() {
        assert_eq!(normalize_package_name("scikit-learn"), "scikit-learn");
    }
}
