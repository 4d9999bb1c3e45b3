//! Storage module for persisting crawl data
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Run tracking (start, finish status, config hash)
//! - Graph snapshots per run, loadable back into a `SiteGraph`

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::MapperError;

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(MapperError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, MapperError> {
    SqliteStorage::new(path)
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub start_url: String,
    pub status: RunStatus,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    /// Stopped by a shutdown request; the stored graph is partial
    Interrupted,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "interrupted" => Some(Self::Interrupted),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_parsing() {
        assert_eq!(RunStatus::from_db_string("interrupted"), Some(RunStatus::Interrupted));
        assert_eq!(RunStatus::Completed.to_db_string(), "completed");
        assert_eq!(RunStatus::from_db_string("invalid"), None);
    }

    #[test]
    fn test_open_storage_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("graph.db");

        let storage = open_storage(&path);
        assert!(storage.is_ok());
        assert!(path.exists());
    }
}
