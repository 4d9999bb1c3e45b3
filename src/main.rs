//! Campus-Mapper main entry point
//!
//! This is the command-line interface for the Campus-Mapper site crawler.

use anyhow::Context;
use campus_mapper::config::{load_config_with_hash, Config, CrawlMode};
use campus_mapper::crawler::{Coordinator, CrawlOutcome};
use campus_mapper::graph::{write_module, ExportMeta};
use campus_mapper::output::{
    generate_markdown_summary, load_latest_graph, print_crawl_stats, print_statistics,
    GraphStatistics, SummaryReport,
};
use campus_mapper::storage::{open_storage, RunStatus, Storage};
use campus_mapper::url::extract_host;
use chrono::Utc;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Campus-Mapper: a single-site crawler and graph refinery
///
/// Campus-Mapper crawls one university website breadth-first, records the
/// link graph, stores it in SQLite and exports it as a Rust module.
#[derive(Parser, Debug)]
#[command(name = "campus-mapper")]
#[command(version = "1.0.0")]
#[command(about = "Maps the link structure of a single website", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Fetch one page at a time regardless of the configured mode
    #[arg(long)]
    sequential: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    dry_run: bool,

    /// Show graph statistics for the latest stored run and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary"])]
    stats: bool,

    /// Write the markdown summary for the latest stored run and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.sequential {
        config.crawler.mode = CrawlMode::Sequential;
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_summary {
        handle_export_summary(&config)?;
    } else {
        handle_crawl(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("campus_mapper=info,warn"),
            1 => EnvFilter::new("campus_mapper=debug,info"),
            2 => EnvFilter::new("campus_mapper=trace,debug"),
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

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    let crawler = &config.crawler;

    println!("=== Campus-Mapper Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", crawler.start_url);
    if let Some(host) = extract_host(&crawler.start_url) {
        println!("  Site host: {}", host);
    }
    println!("  Max depth: {}", crawler.max_depth);
    println!("  Mode: {:?}", crawler.mode);
    println!("  Workers: {}", crawler.workers);
    println!("  Request delay: {}ms", crawler.request_delay);
    println!("  Request timeout: {}s", crawler.request_timeout);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Graph module: {}", config.output.module_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\nRefinement:");
    println!(
        "  Curated: {} allowed prefixes, {} denied, hub threshold {}",
        config.curated.allow_prefixes.len(),
        config.curated.deny_prefixes.len(),
        config.curated.hub_threshold
    );
    println!(
        "  Refined: hub threshold {}, {} nav keywords, {} nav prefixes",
        config.refined.hub_threshold,
        config.refined.nav_keywords.len(),
        config.refined.nav_prefixes.len()
    );
    println!(
        "  Simplified: hub threshold {}, min cluster size {}",
        config.simplified.hub_threshold, config.simplified.min_cluster_size
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics for the latest stored graph
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let (run, graph) = load_latest_graph(&storage)?;

    println!(
        "Run {} ({}) started {}\n",
        run.id,
        run.status.to_db_string(),
        run.started_at
    );
    print_statistics(&GraphStatistics::from_graph(&graph));

    Ok(())
}

/// Handles the --export-summary mode: generates the markdown report
fn handle_export_summary(config: &Config) -> anyhow::Result<()> {
    println!("=== Exporting Crawl Summary ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    let storage = open_storage(Path::new(&config.output.database_path))?;

    tracing::info!("Loading crawl data from database...");
    let (run, graph) = load_latest_graph(&storage)?;

    tracing::info!("Building derived views...");
    let report = SummaryReport::build(run, &graph, config);
    generate_markdown_summary(&report, Path::new(&config.output.summary_path))?;

    println!("✓ Summary exported to: {}", config.output.summary_path);

    Ok(())
}

/// Handles the main crawl operation
///
/// The graph is stored and exported whether the crawl finished or was
/// interrupted by a signal.
async fn handle_crawl(config: Config, config_hash: &str) -> anyhow::Result<()> {
    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    let module_path = PathBuf::from(&config.output.module_path);

    let coordinator = Coordinator::new(config)?;
    spawn_signal_listener(coordinator.shutdown_handle());

    let run_id = storage.create_run(config_hash, coordinator.start_url(), Utc::now())?;
    tracing::debug!("Created run {}", run_id);

    let outcome = match coordinator.run().await {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Err(store_err) = storage.finish_run(run_id, RunStatus::Failed) {
                tracing::warn!("Failed to mark run {} as failed: {}", run_id, store_err);
            }
            return Err(e.into());
        }
    };

    storage.save_graph(run_id, &outcome.graph)?;
    storage.finish_run(run_id, outcome.status)?;
    tracing::info!("Stored graph as run {}", run_id);

    export_module(&module_path, &outcome)?;

    print_crawl_stats(&outcome.stats);
    print_statistics(&GraphStatistics::from_graph(&outcome.graph));

    if outcome.is_interrupted() {
        println!("⚠ Crawl was interrupted; the stored graph is partial");
    }

    Ok(())
}

fn export_module(path: &Path, outcome: &CrawlOutcome) -> anyhow::Result<()> {
    let meta = ExportMeta {
        start_url: outcome.start_url.clone(),
        generated_at: outcome.finished_at,
        interrupted: outcome.is_interrupted(),
    };
    write_module(path, &outcome.graph, &meta)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Sets the shutdown flag on Ctrl-C (and SIGTERM on unix)
fn spawn_signal_listener(shutdown: Arc<AtomicBool>) {
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::warn!("Shutdown requested, finishing in-flight pages...");
        shutdown.store(true, Ordering::SeqCst);
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            tracing::warn!("Cannot listen for SIGTERM: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
