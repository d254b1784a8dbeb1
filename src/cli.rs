use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::ingestion::domain::CostScope;

/// Score, gate and ingest npm packages into a local registry
#[derive(Parser, Debug)]
#[command(name = "registry-gate")]
#[command(version)]
#[command(about = "Score, gate and ingest npm packages into a local registry", long_about = None)]
pub struct Args {
    /// Path to a registry-gate.config.yml (defaults to ./registry-gate.config.yml if present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the metadata and blob stores
    #[arg(long, global = true, value_name = "DIR")]
    pub storage_dir: Option<PathBuf>,

    /// Only print errors and results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve, score and store a package
    Ingest(IngestArgs),
    /// Report the unpacked size of an ingested package's dependencies
    Cost(CostArgs),
    /// Rate the repositories listed in a file, one URL per line (NDJSON output)
    Score(ScoreArgs),
    /// Print the stored rating of an ingested package
    Rate(RateArgs),
}

#[derive(ClapArgs, Debug)]
#[command(group(
    clap::ArgGroup::new("source")
        .required(true)
        .args(["content_file", "url"]),
))]
pub struct IngestArgs {
    /// Package name recorded with the upload
    #[arg(short, long)]
    pub name: String,

    /// Zip archive of the package root
    #[arg(long, value_name = "ZIP")]
    pub content_file: Option<PathBuf>,

    /// npmjs.com package URL or github.com repository URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// Minify JavaScript before storing the archive
    #[arg(long)]
    pub debloat: bool,
}

#[derive(ClapArgs, Debug)]
pub struct CostArgs {
    /// Package ID (name immediately followed by version, e.g. braces3.0.3)
    pub id: String,

    /// Follow dependencies of dependencies
    #[arg(long, conflicts_with = "root_only")]
    pub transitive: bool,

    /// Only report the package's own archive size
    #[arg(long)]
    pub root_only: bool,
}

impl CostArgs {
    pub fn scope(&self) -> CostScope {
        if self.root_only {
            CostScope::RootOnly
        } else if self.transitive {
            CostScope::Transitive
        } else {
            CostScope::FirstLevel
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct ScoreArgs {
    /// File with one URL per line; blank lines and `#` comments are skipped
    pub url_file: PathBuf,
}

#[derive(ClapArgs, Debug)]
pub struct RateArgs {
    /// Package ID
    pub id: String,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Extracts URLs from the contents of a URL file
pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
