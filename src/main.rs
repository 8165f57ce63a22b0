//! District Scout main entry point
//!
//! Command-line interface for the directory crawl and the robots.txt check.

use anyhow::Context;
use clap::{ArgGroup, Parser};
use district_scout::compliance::{run_single_check, run_site_check};
use district_scout::config::{load_config_with_hash, Config};
use district_scout::crawler::{batch_count, create_batches, run_crawl, TargetSet};
use district_scout::input::{read_site_list, read_targets};
use district_scout::output::{print_check_report, print_summary};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// District Scout: a polite school-district directory crawler
///
/// Looks up district identifiers in a public directory in slow, batched
/// browser sessions and records each district's website. It can also check
/// district websites against their robots.txt before they are crawled.
#[derive(Parser, Debug)]
#[command(name = "district-scout")]
#[command(version = "1.0.0")]
#[command(about = "A polite school-district directory crawler", long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["targets", "sites", "website"])))]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// CSV export with a header row; crawl the directory for its target column
    #[arg(long, value_name = "CSV")]
    targets: Option<PathBuf>,

    /// Header-less CSV of name,link rows; check each site's robots.txt
    #[arg(long, value_name = "CSV")]
    sites: Option<PathBuf>,

    /// Check a single website's robots.txt
    #[arg(long, value_name = "URL")]
    website: Option<String>,

    /// Ignore targets already recorded in the result log
    #[arg(long, requires = "targets")]
    fresh: bool,

    /// Show the batches that would be crawled without launching a browser
    #[arg(long, requires = "targets")]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if let Some(path) = &cli.targets {
        let targets = read_targets(path, &config.input.target_column)
            .with_context(|| format!("failed to read targets from {}", path.display()))?;
        if cli.dry_run {
            handle_dry_run(&config, &targets);
        } else {
            handle_crawl(&config, targets, cli.fresh).await?;
        }
    } else if let Some(path) = &cli.sites {
        handle_site_check(&config, path).await?;
    } else if let Some(site) = &cli.website {
        let check = run_single_check(&config, site).await?;
        println!("{}: {}", check.link, check.verdict);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("district_scout=info,warn"),
            1 => EnvFilter::new("district_scout=debug,info"),
            2 => EnvFilter::new("district_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: prints the pacing settings and the batch plan
fn handle_dry_run(config: &Config, targets: &TargetSet) {
    let crawler = &config.crawler;
    let sorted: Vec<_> = targets.iter().cloned().collect();
    let batches = batch_count(sorted.len(), crawler.batch_size);

    println!("=== District Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Batch size: {}", crawler.batch_size);
    println!("  Request delay: {}ms", crawler.request_delay_ms);
    println!("  Batch delay: {}ms", crawler.batch_delay_ms);
    println!("  Max retries: {}", crawler.max_retries);
    println!("  Skip failed targets: {}", crawler.skip_failed_targets);

    println!("\nDirectory:");
    println!("  Search URL: {}", config.directory.search_url);
    println!("  Headless: {}", config.browser.headless);

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);

    println!("\nBatches ({}):", batches);
    for (index, batch) in create_batches(&sorted, crawler.batch_size).enumerate() {
        let ids: Vec<&str> = batch.iter().map(|t| t.as_str()).collect();
        println!("  {:>4}: {}", index + 1, ids.join(", "));
    }

    let request_secs = sorted.len() as u64 * crawler.request_delay_ms / 1000;
    let batch_secs = batches.saturating_sub(1) as u64 * crawler.batch_delay_ms / 1000;
    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would search {} targets (at least {}s of pacing delays)",
        sorted.len(),
        request_secs + batch_secs
    );
}

/// Handles the directory crawl
async fn handle_crawl(config: &Config, targets: TargetSet, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring recorded targets)");
    } else {
        tracing::info!("Starting crawl (targets already recorded are skipped)");
    }

    match run_crawl(config, targets, fresh).await {
        Ok(summary) => {
            tracing::info!("Crawl completed successfully");
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the robots.txt check over a site list
async fn handle_site_check(config: &Config, path: &Path) -> anyhow::Result<()> {
    let sites = read_site_list(path)
        .with_context(|| format!("failed to read site list from {}", path.display()))?;
    let report = run_site_check(config, &sites).await?;
    print_check_report(&report);
    println!("\n✓ Accepted links written to: {}", config.output.accepted_links_path);
    Ok(())
}
