use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use splatscan::config::{ClassifierMode, ExistingReportPolicy, IssueTarget};
use splatscan::scan::{PublishOutcome, RunSummary};
use splatscan::{ClaudeProvider, Config, GitHubClient, ScanConfig, ScanPipeline};

#[derive(Parser, Debug)]
#[command(name = "splatscan")]
#[command(version)]
#[command(about = "Scan GitHub for new Gaussian Splatting viewers and report daily findings")]
struct Args {
    /// Search query; repeat to replace the built-in query list
    #[arg(short, long = "query")]
    queries: Vec<String>,

    /// Only include repositories created within this many hours
    #[arg(long)]
    lookback_hours: Option<u32>,

    /// Directory dated reports are written to
    #[arg(long)]
    findings_dir: Option<PathBuf>,

    /// Repository (owner/name) to open the tracking issue on
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repo: Option<String>,

    /// Write the report but do not open an issue
    #[arg(long)]
    no_issue: bool,

    /// What to do when today's report already exists
    #[arg(long, value_enum, default_value_t = ExistingReportPolicy::Overwrite)]
    on_existing: ExistingReportPolicy,

    /// Classify in token-budgeted batches instead of a single call
    #[arg(long)]
    chunked: bool,

    /// Pages of 100 results to fetch per query
    #[arg(long, default_value = "1")]
    max_pages: u32,

    /// Maximum repositories embedded in the classification prompt
    #[arg(long, default_value = "150")]
    max_classified: usize,

    /// Also write the report to this path (empty to disable)
    #[arg(long, default_value = "latest_report.md")]
    latest_report: String,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Hide the progress bar
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("splatscan={}", level).parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Missing credentials end the run here, before any network call
    let config = Config::from_env()?;
    let scan_config = scan_config_from(&args, &config);
    scan_config.validate()?;

    let issue_target = if args.no_issue {
        None
    } else {
        match args.repo.as_deref() {
            Some(repo) if !repo.is_empty() => Some(IssueTarget::parse(repo)?),
            _ => config.issue_repository.clone(),
        }
    };

    let github = Arc::new(GitHubClient::new(&config.github_token)?);
    let llm = Arc::new(ClaudeProvider::new(
        config.anthropic_api_key.clone(),
        Some(config.anthropic_model.clone()),
    )?);

    let pipeline = ScanPipeline::new(github.clone(), llm, github, issue_target, scan_config)
        .with_progress(!args.quiet);

    tracing::info!("Starting scan...");
    let summary = pipeline.run(Utc::now()).await?;
    print_summary(&summary);

    Ok(())
}

fn scan_config_from(args: &Args, config: &Config) -> ScanConfig {
    let defaults = ScanConfig::default();
    ScanConfig {
        queries: if args.queries.is_empty() {
            defaults.queries.clone()
        } else {
            args.queries.clone()
        },
        lookback_hours: args
            .lookback_hours
            .or(config.lookback_hours)
            .unwrap_or(defaults.lookback_hours),
        findings_dir: args
            .findings_dir
            .clone()
            .or_else(|| config.findings_dir.clone())
            .unwrap_or_else(|| defaults.findings_dir.clone()),
        latest_report: Some(args.latest_report.trim())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from),
        on_existing: args.on_existing,
        classifier: if args.chunked {
            ClassifierMode::Chunked
        } else {
            ClassifierMode::Single
        },
        max_pages: args.max_pages,
        max_classified_repos: args.max_classified,
        ..defaults
    }
}

fn print_summary(summary: &RunSummary) {
    println!("\n{}", "=".repeat(60));
    println!("SCAN COMPLETE");
    println!("{}", "=".repeat(60));
    println!("Date: {}", summary.date.format("%Y-%m-%d"));

    if summary.skipped {
        println!("Skipped: report for this date already exists");
        return;
    }

    println!(
        "Search: {} of {} queries succeeded",
        summary.queries_run - summary.queries_failed,
        summary.queries_run
    );
    println!("Repos found: {}", summary.repos_found);
    println!(
        "Classification: {}",
        if summary.classification_failed { "failed" } else { "ok" }
    );
    if let Some(report) = &summary.report {
        println!(
            "Report: {}{}",
            report.path.display(),
            if report.replaced { " (replaced)" } else { "" }
        );
    }
    match &summary.issue {
        PublishOutcome::Created(issue) => println!("Issue: #{} {}", issue.number, issue.html_url),
        PublishOutcome::Skipped(reason) => println!("Issue: skipped ({})", reason),
        PublishOutcome::Failed(reason) => println!("Issue: failed ({})", reason),
    }
}
