use clap::{Parser, Subcommand};
use pypigraph_cli::crawl_index;
use pypigraph_graph::DependencyGraph;
use pypigraph_index::{DEFAULT_INDEX_URI, PackageIndex, resolve_source_repo};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Build and query a package dependency graph for a package index.
#[derive(Parser)]
#[command(name = "pypigraph", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl the index and write the dependency graph snapshot
    Crawl {
        /// Base URI of the package index
        #[arg(long, default_value = DEFAULT_INDEX_URI)]
        index: String,
        /// Output path for the graph snapshot
        #[arg(long)]
        out: PathBuf,
    },
    /// List the packages a package's latest source distribution requires
    Requires {
        package: String,
        /// Path to a graph snapshot written by `crawl`
        #[arg(long)]
        snapshot: PathBuf,
        /// Emit a JSON array instead of one name per line
        #[arg(long)]
        json: bool,
    },
    /// List the packages whose latest source distributions require a package
    RequiredBy {
        package: String,
        /// Path to a graph snapshot written by `crawl`
        #[arg(long)]
        snapshot: PathBuf,
        /// Emit a JSON array instead of one name per line
        #[arg(long)]
        json: bool,
    },
    /// Resolve a package's canonical source repository URI
    Repo {
        package: String,
        /// Base URI of the package index
        #[arg(long, default_value = DEFAULT_INDEX_URI)]
        index: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Crawl { index, out } => {
            let index = PackageIndex::new(index);
            let mut graph = DependencyGraph::new();
            let stats = crawl_index(&index, &mut graph).await?;
            graph.save(&out)?;
            tracing::info!(
                crawled = stats.crawled,
                skipped = stats.skipped,
                out = %out.display(),
                "snapshot written"
            );
        }
        Command::Requires {
            package,
            snapshot,
            json,
        } => {
            let graph = DependencyGraph::load(&snapshot)?;
            print_packages(graph.requires(&package), json)?;
        }
        Command::RequiredBy {
            package,
            snapshot,
            json,
        } => {
            let graph = DependencyGraph::load(&snapshot)?;
            print_packages(graph.required_by(&package), json)?;
        }
        Command::Repo { package, index } => {
            let index = PackageIndex::new(index);
            let uri = resolve_source_repo(&index, &package).await?;
            println!("{uri}");
        }
    }
    Ok(())
}

fn print_packages(packages: &[String], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(packages)?);
    } else {
        for package in packages {
            println!("{package}");
        }
    }
    Ok(())
}
