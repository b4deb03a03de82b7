//! End-to-end crawl against a mock index.
//!
//! Serves a two-package index (alpha depends on beta, beta ships no
//! requirements metadata) plus one broken package, drives the full crawl,
//! and checks the graph both in memory and after a snapshot round trip.

use flate2::Compression;
use flate2::write::GzEncoder;
use pypigraph_cli::crawl_index;
use pypigraph_graph::DependencyGraph;
use pypigraph_index::{IndexError, PackageIndex};

fn tar_gz_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, path, *contents).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

fn file_anchor(pkg: &str, file: &str) -> String {
    format!("<a href=\"../../packages/source/{pkg}/{file}#md5=0cc175b9c0f1b6a8\">{file}</a><br/>\n")
}

#[tokio::test]
async fn test_crawl_builds_symmetric_graph() {
    let mut server = mockito::Server::new_async().await;

    let _root = server
        .mock("GET", "/simple")
        .with_status(200)
        .with_body("<a href='alpha'>alpha</a><br/>\n<a href='beta'>beta</a><br/>\n")
        .create_async()
        .await;

    let _alpha_files = server
        .mock("GET", "/simple/alpha")
        .with_status(200)
        .with_body(file_anchor("alpha", "alpha-1.0.tar.gz") + &file_anchor("alpha", "alpha-1.1.tar.gz"))
        .create_async()
        .await;
    let _alpha_sdist = server
        .mock("GET", "/packages/source/alpha/alpha-1.1.tar.gz")
        .with_status(200)
        .with_body(tar_gz_bytes(&[(
            "alpha-1.1/alpha.egg-info/requires.txt",
            b"beta>=1.0\n",
        )]))
        .create_async()
        .await;

    let _beta_files = server
        .mock("GET", "/simple/beta")
        .with_status(200)
        .with_body(file_anchor("beta", "beta-0.3.tar.gz"))
        .create_async()
        .await;
    // beta's sdist has no requires.txt at all: a known, dependency-free node.
    let _beta_sdist = server
        .mock("GET", "/packages/source/beta/beta-0.3.tar.gz")
        .with_status(200)
        .with_body(tar_gz_bytes(&[("beta-0.3/setup.py", b"pass\n")]))
        .create_async()
        .await;

    let index = PackageIndex::new(server.url());
    let mut graph = DependencyGraph::new();
    let stats = crawl_index(&index, &mut graph).await.unwrap();

    assert_eq!(stats.crawled, 2);
    assert_eq!(stats.skipped, 0);
    assert_eq!(graph.requires("alpha"), ["beta"]);
    assert_eq!(graph.required_by("beta"), ["alpha"]);
    assert!(graph.requires("beta").is_empty());
    assert!(graph.contains("beta"));

    // The snapshot round trip preserves all of it.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pypi_graph");
    graph.save(&path).unwrap();
    let loaded = DependencyGraph::load(&path).unwrap();

    assert_eq!(loaded.requires("alpha"), ["beta"]);
    assert_eq!(loaded.required_by("beta"), ["alpha"]);
    assert!(loaded.requires("beta").is_empty());
}

#[tokio::test]
async fn test_crawl_skips_failing_package_and_continues() {
    let mut server = mockito::Server::new_async().await;

    let _root = server
        .mock("GET", "/simple")
        .with_status(200)
        .with_body("<a href='broken'>broken</a><br/>\n<a href='gamma'>gamma</a><br/>\n")
        .create_async()
        .await;

    let _broken_files = server
        .mock("GET", "/simple/broken")
        .with_status(200)
        .with_body(file_anchor("broken", "broken-1.0.tar.gz"))
        .create_async()
        .await;
    // Malformed requirements metadata: the package must be excluded entirely.
    let _broken_sdist = server
        .mock("GET", "/packages/source/broken/broken-1.0.tar.gz")
        .with_status(200)
        .with_body(tar_gz_bytes(&[(
            "broken-1.0/broken.egg-info/requires.txt",
            b"good-dep\nbad dep line\n",
        )]))
        .create_async()
        .await;

    let _gamma_files = server
        .mock("GET", "/simple/gamma")
        .with_status(200)
        .with_body(file_anchor("gamma", "gamma-2.0.tar.gz"))
        .create_async()
        .await;
    let _gamma_sdist = server
        .mock("GET", "/packages/source/gamma/gamma-2.0.tar.gz")
        .with_status(200)
        .with_body(tar_gz_bytes(&[(
            "gamma-2.0/gamma.egg-info/requires.txt",
            b"delta==0.1\n",
        )]))
        .create_async()
        .await;

    let index = PackageIndex::new(server.url());
    let mut graph = DependencyGraph::new();
    let stats = crawl_index(&index, &mut graph).await.unwrap();

    assert_eq!(stats.crawled, 1);
    assert_eq!(stats.skipped, 1);
    // Not even the parseable half of broken's requirements made it in.
    assert!(!graph.contains("broken"));
    assert!(!graph.contains("good-dep"));
    assert_eq!(graph.requires("gamma"), ["delta"]);
}

#[tokio::test]
async fn test_crawl_aborts_when_listing_fails() {
    let mut server = mockito::Server::new_async().await;

    let _root = server
        .mock("GET", "/simple")
        .with_status(500)
        .create_async()
        .await;

    let index = PackageIndex::new(server.url());
    let mut graph = DependencyGraph::new();
    let err = crawl_index(&index, &mut graph).await.unwrap_err();

    assert!(matches!(err, IndexError::Core(_)));
    assert!(graph.is_empty());
}
