//! Output module for crawl reports
//!
//! This module handles:
//! - Structural statistics of a crawled graph
//! - Terminal summaries of a finished crawl
//! - Markdown reports of stored runs

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_summary, generate_markdown_summary, SummaryReport, ViewSize};
pub use stats::{print_crawl_stats, print_statistics, GraphStatistics};

use crate::graph::SiteGraph;
use crate::storage::{RunRecord, Storage, StorageError};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("No crawl runs found in database")]
    NoRuns,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Loads the most recent run and its stored graph
///
/// # Arguments
///
/// * `storage` - The storage backend containing crawl data
///
/// # Returns
///
/// * `Ok((RunRecord, SiteGraph))` - The latest run and its graph
/// * `Err(OutputError::NoRuns)` - The database holds no runs yet
pub fn load_latest_graph(storage: &dyn Storage) -> OutputResult<(RunRecord, SiteGraph)> {
    let run = storage.get_latest_run()?.ok_or(OutputError::NoRuns)?;
    let graph = storage.load_graph(run.id)?;
    tracing::debug!(
        "Loaded run {} with {} pages and {} links",
        run.id,
        graph.node_count(),
        graph.edge_count()
    );
    Ok((run, graph))
}
