//! Capstan - catalog ingestion and package search for OLM catalogs
//!
//! Reads a rendered catalog payload (NDJSON) from a file, stdin, or a
//! catalog service URL, and answers package searches against the indexed
//! result.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use capstan_core::{CatalogStore, IngestSummary};

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "capstan",
    about = "Catalog ingestion and package search for OLM catalogs",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest a catalog stream and report what was admitted
    Ingest {
        /// Catalog payload file (reads stdin if omitted)
        input: Option<PathBuf>,

        /// Catalog service base URL (the api/v1/all endpoint is appended)
        #[clap(long, conflicts_with = "input")]
        url: Option<String>,

        /// Output the summary as JSON
        #[clap(long)]
        json: bool,
    },

    /// Search an ingested catalog for packages matching a regular expression
    Search {
        /// Regular expression matched anywhere in the package name
        pattern: String,

        /// Catalog payload file (reads stdin if omitted)
        #[clap(long)]
        input: Option<PathBuf>,

        /// Catalog service base URL (the api/v1/all endpoint is appended)
        #[clap(long, conflicts_with = "input")]
        url: Option<String>,

        /// Output the raw package → versions mapping as JSON
        #[clap(long)]
        json: bool,
    },

    /// List all indexed packages with their version counts
    Packages {
        /// Catalog payload file (reads stdin if omitted)
        input: Option<PathBuf>,

        /// Catalog service base URL (the api/v1/all endpoint is appended)
        #[clap(long, conflicts_with = "input")]
        url: Option<String>,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },
}

#[derive(Tabled)]
struct SearchResultRow {
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Versions")]
    versions: String,
}

#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Versions")]
    version_count: usize,
}

/// Initialize tracing from the --log-level flag. Diagnostics go to stderr so
/// JSON output on stdout stays machine-readable.
fn initialize_tracing(log_level: &LogLevel) {
    let filter = EnvFilter::new(log_level.to_filter_directive());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_level);

    match cli.command {
        Command::Ingest { input, url, json } => {
            let store = CatalogStore::new();
            let summary = load_catalog(&store, input.as_deref(), url.as_deref()).await?;
            print_summary(&summary, json)?;
        }
        Command::Search {
            pattern,
            input,
            url,
            json,
        } => {
            let store = CatalogStore::new();
            let summary = load_catalog(&store, input.as_deref(), url.as_deref()).await?;
            debug!(
                "ingested {} bundles across {} packages",
                summary.admitted,
                store.package_count()
            );

            let results = store
                .search(&pattern)
                .with_context(|| format!("Search failed for pattern '{pattern}'"))?;
            print_search_results(&results, json)?;
        }
        Command::Packages { input, url, json } => {
            let store = CatalogStore::new();
            load_catalog(&store, input.as_deref(), url.as_deref()).await?;
            print_packages(&store.snapshot(), json)?;
        }
    }

    Ok(())
}

/// Ingest from whichever source was requested: URL, file, or stdin.
async fn load_catalog(
    store: &CatalogStore,
    input: Option<&Path>,
    url: Option<&str>,
) -> Result<IngestSummary> {
    if let Some(url) = url {
        return fetch_remote(store, url).await;
    }

    let reader = open_input(input)?;
    store.ingest(reader).context("Failed to ingest catalog stream")
}

#[cfg(feature = "remote")]
async fn fetch_remote(store: &CatalogStore, base: &str) -> Result<IngestSummary> {
    use capstan_core::remote;

    let endpoint = remote::catalog_endpoint(base);
    remote::fetch_catalog(store, &endpoint).await
}

/// Stub for when the remote feature is disabled
#[cfg(not(feature = "remote"))]
async fn fetch_remote(_store: &CatalogStore, _base: &str) -> Result<IngestSummary> {
    anyhow::bail!("Remote fetch is not enabled. Rebuild with --features remote")
}

fn open_input(input: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open catalog file: {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn print_summary(summary: &IngestSummary, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("Ingested {} bundle record(s) from {} line(s)", summary.admitted, summary.lines);
    if summary.decode_failures > 0 {
        println!("  {} line(s) failed to decode", summary.decode_failures);
    }
    if summary.filtered > 0 {
        println!("  {} record(s) filtered (schema/name)", summary.filtered);
    }
    if summary.malformed_names > 0 {
        println!("  {} bundle name(s) malformed", summary.malformed_names);
    }
    Ok(())
}

fn print_search_results(
    results: &std::collections::HashMap<String, Vec<String>>,
    json_output: bool,
) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No packages matched.");
        return Ok(());
    }

    // Sort for stable terminal output; the mapping itself is unordered.
    let mut names: Vec<&String> = results.keys().collect();
    names.sort();

    let table_rows: Vec<SearchResultRow> = names
        .iter()
        .map(|name| SearchResultRow {
            package: (*name).clone(),
            versions: results[*name].join(", "),
        })
        .collect();

    let table = Table::new(&table_rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();

    println!("Found {} package(s):\n", results.len());
    println!("{table}");
    Ok(())
}

fn print_packages(
    snapshot: &std::collections::HashMap<String, Vec<String>>,
    json_output: bool,
) -> Result<()> {
    if json_output {
        let counts: std::collections::BTreeMap<&String, usize> = snapshot
            .iter()
            .map(|(package, versions)| (package, versions.len()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    if snapshot.is_empty() {
        println!("No packages indexed.");
        return Ok(());
    }

    let mut table_rows: Vec<PackageRow> = snapshot
        .iter()
        .map(|(package, versions)| PackageRow {
            package: package.clone(),
            version_count: versions.len(),
        })
        .collect();
    table_rows.sort_by(|a, b| a.package.cmp(&b.package));

    let table = Table::new(&table_rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();

    println!("{table}");
    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn test_search_args_parse() {
        let cli = Cli::try_parse_from([
            "capstan",
            "search",
            "prometheus.*",
            "--input",
            "catalog.json",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Command::Search {
                pattern,
                input,
                url,
                json,
            } => {
                assert_eq!(pattern, "prometheus.*");
                assert_eq!(input, Some(PathBuf::from("catalog.json")));
                assert_eq!(url, None);
                assert!(json);
            }
            other => panic!("expected search command, got {other:?}"),
        }
    }

    #[test]
    fn test_input_and_url_conflict() {
        let result = Cli::try_parse_from([
            "capstan",
            "search",
            "x",
            "--input",
            "catalog.json",
            "--url",
            "https://example.com/catalogs/foo",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level_directives() {
        assert_eq!(LogLevel::Error.to_filter_directive(), "error");
        assert_eq!(LogLevel::Trace.to_filter_directive(), "trace");
    }

    #[test]
    fn test_ingest_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["capstan", "ingest"]).unwrap();
        match cli.command {
            Command::Ingest { input, url, .. } => {
                assert_eq!(input, None);
                assert_eq!(url, None);
            }
            other => panic!("expected ingest command, got {other:?}"),
        }
    }
}
