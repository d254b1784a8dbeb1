use base64::Engine as _;
use owo_colors::OwoColorize;
use registry_gate::adapters::outbound::console::StderrProgressReporter;
use registry_gate::adapters::outbound::network::{
    CachingRegistryClient, GitHubClient, NpmRegistryClient,
};
use registry_gate::adapters::outbound::storage::{FileBlobStore, FileMetadataStore};
use registry_gate::application::dto::{CostRequest, IngestRequest};
use registry_gate::application::metrics::MetricEngine;
use registry_gate::application::use_cases::{
    IngestPackageUseCase, RatePackageUseCase, ResolveDependencyCostUseCase, ScoreUrlsUseCase,
    SourceResolver, UrlScore,
};
use registry_gate::cli::{parse_url_list, Args, Command, CostArgs, IngestArgs};
use registry_gate::config::{
    discover_config, load_config_from_path, Settings, GITHUB_TOKEN_ENV,
};
use registry_gate::ingestion::services::ManifestExtractor;
use registry_gate::ports::outbound::{PackageRegistry, SourceHost};
use registry_gate::shared::error::{ExitCode, GateError};
use registry_gate::shared::security::validate_regular_file;
use registry_gate::shared::Result;
use std::io::Write;
use std::path::Path;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse_args();
    init_tracing();

    if let Err(e) = run(args).await {
        eprintln!("\n{}\n", "❌ An error occurred:".red().bold());
        eprintln!("{}", e);

        // Display error chain
        for cause in e.chain().skip(1) {
            eprintln!("\nCaused by: {}", cause);
        }

        eprintln!();
        let code = e
            .downcast_ref::<GateError>()
            .map(GateError::exit_code)
            .unwrap_or(ExitCode::ApplicationError);
        process::exit(code.as_i32());
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let config = match args.config.as_deref() {
        Some(path) => Some(load_config_from_path(path)?),
        None => discover_config(Path::new("."))?,
    };
    let settings = Settings::from_config(config)
        .with_env_token(std::env::var(GITHUB_TOKEN_ENV).ok())
        .with_storage_dir(args.storage_dir.clone());
    tracing::debug!(
        storage_dir = %settings.storage_dir.display(),
        authenticated = settings.github_token.is_some(),
        "settings resolved"
    );

    let reporter = if args.quiet {
        StderrProgressReporter::quiet()
    } else {
        StderrProgressReporter::new()
    };

    match args.command {
        Command::Ingest(ingest) => run_ingest(&settings, ingest, reporter).await,
        Command::Cost(cost) => run_cost(&settings, cost).await,
        Command::Score(score) => run_score(&settings, &score.url_file, reporter).await,
        Command::Rate(rate) => {
            let use_case = RatePackageUseCase::new(FileMetadataStore::new(&settings.storage_dir));
            let rating = use_case.execute(&rate.id).await?;
            print_json(&rating)
        }
    }
}

fn npm_client(settings: &Settings) -> Result<NpmRegistryClient> {
    NpmRegistryClient::new(settings.npm_registry_url.as_str(), settings.timeout)
}

fn github_client(settings: &Settings) -> Result<Arc<dyn SourceHost>> {
    if settings.github_token.is_none() {
        tracing::warn!(
            "no GitHub token configured; requests are rate limited and the EngineeringProcess metric is unavailable"
        );
    }
    Ok(Arc::new(GitHubClient::new(
        settings.github_api_url.as_str(),
        settings.github_web_url.as_str(),
        settings.github_token.as_deref(),
        settings.timeout,
    )?))
}

async fn run_ingest(
    settings: &Settings,
    ingest: IngestArgs,
    reporter: StderrProgressReporter,
) -> Result<()> {
    let request = match (ingest.content_file, ingest.url) {
        (Some(path), None) => {
            validate_regular_file(&path, "Content file")?;
            let bytes = tokio::fs::read(&path).await?;
            let content = base64::engine::general_purpose::STANDARD.encode(bytes);
            IngestRequest::from_content(ingest.name, content, ingest.debloat)
        }
        (None, Some(url)) => IngestRequest::from_url(ingest.name, url, ingest.debloat),
        _ => {
            return Err(GateError::InvalidRequest {
                reason: "exactly one of --content-file or --url is required".to_string(),
            }
            .into())
        }
    };

    let registry: Arc<dyn PackageRegistry> = Arc::new(npm_client(settings)?);
    let host = github_client(settings)?;
    let resolver = SourceResolver::new(
        registry,
        host.clone(),
        ManifestExtractor::new(settings.strict_readme),
    );

    let use_case = IngestPackageUseCase::new(
        resolver,
        MetricEngine::new(host),
        FileMetadataStore::new(&settings.storage_dir),
        FileBlobStore::new(&settings.storage_dir),
        reporter,
    );

    let response = use_case.execute(request).await?;
    print_json(&response)
}

async fn run_cost(settings: &Settings, cost: CostArgs) -> Result<()> {
    let use_case = ResolveDependencyCostUseCase::new(
        npm_client(settings)?,
        FileMetadataStore::new(&settings.storage_dir),
        FileBlobStore::new(&settings.storage_dir),
    )
    .with_max_depth(settings.max_depth);

    let report = use_case
        .execute(CostRequest::new(cost.id.as_str(), cost.scope()))
        .await?;
    print_json(&report)
}

async fn run_score(
    settings: &Settings,
    url_file: &Path,
    reporter: StderrProgressReporter,
) -> Result<()> {
    validate_regular_file(url_file, "URL file")?;
    let content = tokio::fs::read_to_string(url_file).await?;
    let urls = parse_url_list(&content);

    let registry: Arc<dyn PackageRegistry> =
        Arc::new(CachingRegistryClient::new(npm_client(settings)?));
    let use_case = ScoreUrlsUseCase::new(registry, MetricEngine::new(github_client(settings)?), reporter);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for score in use_case.execute(&urls).await {
        writeln!(out, "{}", score_line(&score)?)?;
    }
    Ok(())
}

/// One NDJSON line: the URL plus either the rating fields or an error
fn score_line(score: &UrlScore) -> Result<String> {
    let mut line = serde_json::Map::new();
    line.insert("URL".to_string(), score.url.clone().into());
    match &score.outcome {
        Ok(rating) => {
            if let serde_json::Value::Object(fields) = serde_json::to_value(rating)? {
                line.extend(fields);
            }
        }
        Err(message) => {
            line.insert("error".to_string(), message.clone().into());
        }
    }
    Ok(serde_json::to_string(&line)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
