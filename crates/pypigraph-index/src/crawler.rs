//! Package index client.
//!
//! Consumes the index's "simple" HTML interface: a root listing of every
//! package, and a per-package listing of downloadable files. Both pages are
//! parsed with format-exact regexes — the listings are machine-generated and
//! uniform, so any deviation means the page format changed and the data
//! cannot be trusted.

use crate::error::{IndexError, Result};
use crate::requirement::Requirement;
use once_cell::sync::Lazy;
use pypigraph_core::{ArchiveKind, CoreError, HttpClient, fetch_matching};
use regex::Regex;

/// Default index to crawl.
pub const DEFAULT_INDEX_URI: &str = "https://pypi.org";

/// Root listing: every package appears as a self-referential anchor.
static ALL_PACKAGES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<a href='([A-Za-z0-9._-]+)'>([A-Za-z0-9._-]+)</a><br/>")
        .expect("package listing regex")
});

/// Per-package listing: file anchors carry an md5 fragment on the href.
static PACKAGE_FILES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<a href="([/A-Za-z0-9._-]+)#md5=[0-9a-f]+"[^>]*>([A-Za-z0-9._-]+)</a><br/>"#)
        .expect("file listing regex")
});

static SDIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[/A-Za-z0-9._-]+\.tar\.gz$").expect("sdist regex"));

/// Requirements metadata lives in an egg-info directory at any depth.
static REQUIRES_FILE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|/)[^/]*\.egg-info/requires\.txt$").expect("requires.txt regex")
});

/// Client for one package index.
///
/// # Examples
///
/// ```no_run
/// use pypigraph_index::PackageIndex;
///
/// # #[tokio::main]
/// # async fn main() -> pypigraph_index::Result<()> {
/// let index = PackageIndex::new("https://pypi.org");
/// let packages = index.all_packages().await?;
/// for pkg in &packages {
///     if let Some(requirements) = index.package_requirements(pkg).await? {
///         println!("{pkg}: {} requirements", requirements.len());
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct PackageIndex {
    base_uri: String,
    client: HttpClient,
}

impl PackageIndex {
    /// Creates a client for the index at `base_uri` (scheme and host, no
    /// trailing slash required).
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self::with_client(base_uri, HttpClient::new())
    }

    /// Creates a client reusing an existing [`HttpClient`].
    pub fn with_client(base_uri: impl Into<String>, client: HttpClient) -> Self {
        let mut base_uri = base_uri.into();
        while base_uri.ends_with('/') {
            base_uri.pop();
        }
        Self { base_uri, client }
    }

    /// The index root this client talks to.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub(crate) fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Lists every package name on the index root listing page.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::ListingFormat`] if any anchor's href does not
    /// equal its displayed text — the whole listing is rejected, because a
    /// single anomaly indicates the page format changed. Transport failures
    /// here are fatal to a crawl; this is the one listing the run cannot
    /// proceed without.
    pub async fn all_packages(&self) -> Result<Vec<String>> {
        let body = self
            .client
            .get_text(&format!("{}/simple", self.base_uri))
            .await?;

        let mut packages = Vec::new();
        for caps in ALL_PACKAGES_RE.captures_iter(&body) {
            let (href, text) = (&caps[1], &caps[2]);
            if href != text {
                return Err(IndexError::ListingFormat {
                    detail: format!("anchor href {href:?} does not match text {text:?}"),
                });
            }
            packages.push(href.to_owned());
        }
        Ok(packages)
    }

    /// Lists candidate file paths for one package, resolved against the
    /// per-package listing path.
    pub async fn package_files(&self, pkg: &str) -> Result<Vec<String>> {
        let listing_path = format!("/simple/{pkg}");
        let body = self
            .client
            .get_text(&format!("{}{listing_path}", self.base_uri))
            .await?;

        Ok(PACKAGE_FILES_RE
            .captures_iter(&body)
            .map(|caps| resolve_href(&listing_path, &caps[1]))
            .collect())
    }

    /// Fetches and parses the requirements metadata of `pkg`'s latest source
    /// distribution.
    ///
    /// Returns `Ok(None)` for the expected absence outcomes — no files
    /// listed, no source distribution among them, or no `requires.txt`
    /// inside the archive — each logged with its cause. A package
    /// legitimately may have none of these; the caller decides whether that
    /// still counts as a known package.
    ///
    /// # Errors
    ///
    /// Transport and archive failures propagate. If any single line of the
    /// requirements file fails to parse, the whole package's extraction
    /// fails: a malformed requirements file is a data-quality problem worth
    /// surfacing, not a partial result.
    pub async fn package_requirements(&self, pkg: &str) -> Result<Option<Vec<Requirement>>> {
        let files = self.package_files(pkg).await?;
        if files.is_empty() {
            tracing::warn!(package = pkg, "no files listed for package");
            return Ok(None);
        }

        let Some(path) = latest_sdist(&files) else {
            tracing::warn!(package = pkg, ?files, "no source distribution found");
            return Ok(None);
        };

        let url = format!("{}{path}", self.base_uri);
        let raw = match fetch_matching(&self.client, &url, &REQUIRES_FILE_RE, ArchiveKind::TarGz)
            .await
        {
            Ok(raw) => raw,
            Err(CoreError::NoMatch { .. }) => {
                tracing::warn!(package = pkg, url = %url, "no requires.txt in source distribution");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let text = String::from_utf8_lossy(&raw);
        let mut requirements = Vec::new();
        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            requirements.push(line.parse::<Requirement>()?);
        }
        Ok(Some(requirements))
    }
}

/// Selects the most recent source distribution from a file list.
///
/// Index pages list files in upload order, so the scan runs from the end and
/// the last `.tar.gz` path wins.
///
/// # Examples
///
/// ```
/// use pypigraph_index::latest_sdist;
///
/// let files = [
///     "/packages/p/pkg-1.0.zip".to_string(),
///     "/packages/p/pkg-1.0.tar.gz".to_string(),
///     "/packages/p/pkg-1.1.tar.gz".to_string(),
/// ];
/// assert_eq!(latest_sdist(&files), Some("/packages/p/pkg-1.1.tar.gz"));
///
/// let only_zip = ["/packages/p/pkg-1.0.zip".to_string()];
/// assert_eq!(latest_sdist(&only_zip), None);
/// ```
pub fn latest_sdist(files: &[String]) -> Option<&str> {
    files
        .iter()
        .rev()
        .find(|file| SDIST_RE.is_match(file))
        .map(String::as_str)
}

/// Resolves an href against a listing path, lexically collapsing `.` and
/// `..` segments.
fn resolve_href(base: &str, href: &str) -> String {
    let joined = if href.starts_with('/') {
        href.to_owned()
    } else {
        format!("{base}/{href}")
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}
