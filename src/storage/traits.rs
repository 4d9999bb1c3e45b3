//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::graph::SiteGraph;
use crate::storage::{RunRecord, RunStatus};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Invalid run status in database: {0}")]
    InvalidStatus(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// A backend keeps a list of crawl runs and one graph snapshot per run.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run in the `running` state
    ///
    /// # Arguments
    ///
    /// * `config_hash` - SHA-256 of the configuration file
    /// * `start_url` - Seed URL of the crawl
    /// * `started_at` - When the crawl started
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(
        &mut self,
        config_hash: &str,
        start_url: &str,
        started_at: DateTime<Utc>,
    ) -> StorageResult<i64>;

    /// Sets the final status of a run and stamps its finish time
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    // ===== Graph Snapshots =====

    /// Replaces the stored graph of a run, in one transaction
    fn save_graph(&mut self, run_id: i64, graph: &SiteGraph) -> StorageResult<()>;

    /// Loads the stored graph of a run, preserving node order
    fn load_graph(&self, run_id: i64) -> StorageResult<SiteGraph>;

    // ===== Statistics =====

    /// Number of stored pages for a run
    fn count_pages(&self, run_id: i64) -> StorageResult<u64>;

    /// Number of stored links for a run
    fn count_links(&self, run_id: i64) -> StorageResult<u64>;

    /// Pages per depth for a run (pages without depth are left out)
    fn depth_breakdown(&self, run_id: i64) -> StorageResult<BTreeMap<u32, usize>>;
}
