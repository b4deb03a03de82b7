//! Source repository resolution.
//!
//! Maps a package to its canonical source-control repository URI by reading
//! the `PKG-INFO` descriptor out of its latest source distribution and
//! running a host-specific regex cascade over it. The cascade trades
//! precision for recall in order: exact host patterns first, then a static
//! override table for popular packages whose metadata points elsewhere, then
//! a generic homepage fallback that only ever produces an error — but an
//! error a human can triage, because it carries the homepage (or the raw
//! metadata) verbatim.

use crate::crawler::{PackageIndex, latest_sdist};
use crate::error::{IndexError, Result};
use once_cell::sync::Lazy;
use pypigraph_core::{ArchiveKind, fetch_matching, normalize_package_name};
use regex::Regex;
use std::collections::HashMap;

/// Host-specific patterns, ordered; each captures `scheme://host/owner/repo`
/// and discards trailing path segments (`/issues`, `/tree/master`, ...).
static REPO_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"Home-page: (https?://github\.com/[^/\n]+/[^/\n]+)(?:/[^\n]*)?\n",
        r"Home-page: (https?://bitbucket\.org/[^/\n]+/[^/\n]+)(?:/[^\n]*)?\n",
        r"Home-page: (https?://code\.google\.com/p/[^/\n]+)(?:/[^\n]*)?\n",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("repo pattern"))
    .collect()
});

static HOMEPAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Home-page: (.+)\n").expect("homepage regex"));

/// Descriptor metadata lives at `PKG-INFO`, at any depth inside the archive.
static PKG_INFO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|/)PKG-INFO$").expect("PKG-INFO regex"));

/// Overrides for packages whose metadata does not point at their repository.
/// Keyed by normalized package name; values are host-rooted URIs without a
/// scheme.
static REPO_OVERRIDES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ansible", "github.com/ansible/ansible"),
        ("apache-libcloud", "github.com/apache/libcloud"),
        ("bottle", "github.com/bottlepy/bottle"),
        ("celery", "github.com/celery/celery"),
        ("chameleon", "github.com/malthe/chameleon"),
        ("coverage", "bitbucket.org/ned/coveragepy"),
        ("distribute", "bitbucket.org/tarek/distribute"),
        ("django", "github.com/django/django"),
        ("django-cms", "github.com/divio/django-cms"),
        ("django-tastypie", "github.com/toastdriven/django-tastypie"),
        ("djangocms-admin-style", "github.com/divio/djangocms-admin-style"),
        ("djangorestframework", "github.com/tomchristie/django-rest-framework"),
        ("eve", "github.com/nicolaiarocci/eve"),
        ("fabric", "github.com/fabric/fabric"),
        ("flask", "github.com/mitsuhiko/flask"),
        ("gevent", "github.com/surfly/gevent"),
        ("gunicorn", "github.com/benoitc/gunicorn"),
        ("httpie", "github.com/jkbr/httpie"),
        ("httplib2", "github.com/jcgregorio/httplib2"),
        ("itsdangerous", "github.com/mitsuhiko/itsdangerous"),
        ("jinja2", "github.com/mitsuhiko/jinja2"),
        ("kazoo", "github.com/python-zk/kazoo"),
        ("kombu", "github.com/celery/kombu"),
        ("lamson", "github.com/zedshaw/lamson"),
        ("libcloud", "github.com/apache/libcloud"),
        ("lxml", "github.com/lxml/lxml"),
        ("mako", "github.com/zzzeek/mako"),
        ("markupsafe", "github.com/mitsuhiko/markupsafe"),
        ("matplotlib", "github.com/matplotlib/matplotlib"),
        ("mimeparse", "github.com/crosbymichael/mimeparse"),
        ("mock", "github.com/beyang/mock"),
        ("nltk", "github.com/nltk/nltk"),
        ("nose", "github.com/nose-devs/nose"),
        ("nova", "github.com/openstack/nova"),
        ("numpy", "github.com/numpy/numpy"),
        ("pandas", "github.com/pydata/pandas"),
        ("pastedeploy", "bitbucket.org/ianb/pastedeploy"),
        ("pattern", "github.com/clips/pattern"),
        ("psycopg2", "github.com/beyang/psycopg2"),
        ("pyramid", "github.com/Pylons/pyramid"),
        ("python-dateutil", "github.com/paxan/python-dateutil"),
        ("python-lust", "github.com/zedshaw/python-lust"),
        ("pyyaml", "github.com/yaml/pyyaml"),
        ("repoze-lru", "github.com/repoze/repoze.lru"),
        ("requests", "github.com/kennethreitz/requests"),
        ("salt", "github.com/saltstack/salt"),
        ("scikit-learn", "github.com/scikit-learn/scikit-learn"),
        ("scipy", "github.com/scipy/scipy"),
        ("sentry", "github.com/getsentry/sentry"),
        ("setuptools", "github.com/jaraco/setuptools"),
        ("sockjs-tornado", "github.com/mrjoes/sockjs-tornado"),
        ("south", "bitbucket.org/andrewgodwin/south"),
        ("sqlalchemy", "github.com/zzzeek/sqlalchemy"),
        ("ssh", "github.com/bitprophet/ssh"),
        ("tornado", "github.com/facebook/tornado"),
        ("translationstring", "github.com/Pylons/translationstring"),
        ("tulip", "github.com/sourcegraph/tulip"),
        ("venusian", "github.com/Pylons/venusian"),
        ("webob", "github.com/Pylons/webob"),
        ("webpy", "github.com/webpy/webpy"),
        ("werkzeug", "github.com/mitsuhiko/werkzeug"),
        ("zope-interface", "github.com/zopefoundation/zope.interface"),
    ])
});

/// Resolves the canonical source repository URI for `pkg`.
///
/// Fetches the `PKG-INFO` descriptor from the package's latest source
/// distribution, then applies the cascade: host patterns, override table,
/// homepage fallback. First success wins.
///
/// # Errors
///
/// - [`IndexError::NoSourceArtifact`] if the package has no `.tar.gz` file.
/// - [`IndexError::UnparseableHomepage`] when the metadata names a homepage
///   no pattern recognizes — the homepage travels in the error verbatim.
/// - [`IndexError::NoHomepage`] when the metadata has no homepage at all —
///   the raw metadata travels instead.
/// - Transport and archive failures propagate from the core layer.
pub async fn resolve_source_repo(index: &PackageIndex, pkg: &str) -> Result<String> {
    let files = index.package_files(pkg).await?;
    let Some(path) = latest_sdist(&files) else {
        return Err(IndexError::NoSourceArtifact {
            package: pkg.to_owned(),
        });
    };

    let url = format!("{}{path}", index.base_uri());
    let raw = fetch_matching(index.client(), &url, &PKG_INFO_RE, ArchiveKind::TarGz).await?;
    let metadata = String::from_utf8_lossy(&raw).into_owned();

    repo_uri_from_metadata(pkg, &metadata)
}

/// The cascade itself, split out so it can run on metadata from any source.
fn repo_uri_from_metadata(pkg: &str, metadata: &str) -> Result<String> {
    for pattern in REPO_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(metadata) {
            return Ok(caps[1].to_owned());
        }
    }

    if let Some(uri) = REPO_OVERRIDES.get(normalize_package_name(pkg).as_str()) {
        return Ok(format!("https://{uri}"));
    }

    if let Some(caps) = HOMEPAGE_RE.captures(metadata) {
        return Err(IndexError::UnparseableHomepage {
            homepage: caps[1].to_owned(),
        });
    }
    Err(IndexError::NoHomepage {
        metadata: metadata.to_owned(),
    })
}
