//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::graph::SiteGraph;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use crate::MapperError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::path::Path;

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, start_url, status";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file; missing parent directories are created
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(MapperError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, MapperError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, MapperError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn ensure_run(&self, run_id: i64) -> StorageResult<()> {
        let exists: Option<i64> = self
            .conn
            .query_row("SELECT id FROM runs WHERE id = ?1", params![run_id], |row| {
                row.get(0)
            })
            .optional()?;

        exists.map(|_| ()).ok_or(StorageError::RunNotFound(run_id))
    }
}

/// Maps a `runs` row selected with `RUN_COLUMNS`
fn run_from_row(row: &Row<'_>) -> rusqlite::Result<(RunRecord, String)> {
    let status: String = row.get(5)?;
    Ok((
        RunRecord {
            id: row.get(0)?,
            started_at: row.get(1)?,
            finished_at: row.get(2)?,
            config_hash: row.get(3)?,
            start_url: row.get(4)?,
            status: RunStatus::Running,
        },
        status,
    ))
}

fn with_status((mut run, status): (RunRecord, String)) -> StorageResult<RunRecord> {
    run.status = RunStatus::from_db_string(&status).ok_or(StorageError::InvalidStatus(status))?;
    Ok(run)
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(
        &mut self,
        config_hash: &str,
        start_url: &str,
        started_at: DateTime<Utc>,
    ) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, start_url, status) VALUES (?1, ?2, ?3, ?4)",
            params![
                started_at.to_rfc3339(),
                config_hash,
                start_url,
                RunStatus::Running.to_db_string()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))?;

        with_status(row)
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS),
                [],
                run_from_row,
            )
            .optional()?
            .map(with_status)
            .transpose()
    }

    // ===== Graph Snapshots =====

    fn save_graph(&mut self, run_id: i64, graph: &SiteGraph) -> StorageResult<()> {
        self.ensure_run(run_id)?;

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM links WHERE run_id = ?1", params![run_id])?;
        tx.execute("DELETE FROM pages WHERE run_id = ?1", params![run_id])?;

        {
            let mut insert_page = tx.prepare(
                "INSERT INTO pages (run_id, url, label, depth, position) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (position, node) in graph.nodes().enumerate() {
                insert_page.execute(params![
                    run_id,
                    node.url,
                    node.label,
                    node.depth,
                    position as i64
                ])?;
            }

            let mut insert_link =
                tx.prepare("INSERT INTO links (run_id, source, target) VALUES (?1, ?2, ?3)")?;
            for (source, target) in graph.edges() {
                insert_link.execute(params![run_id, source, target])?;
            }
        }

        tx.commit()?;

        tracing::debug!(
            "Saved graph for run {}: {} pages, {} links",
            run_id,
            graph.node_count(),
            graph.edge_count()
        );
        Ok(())
    }

    fn load_graph(&self, run_id: i64) -> StorageResult<SiteGraph> {
        self.ensure_run(run_id)?;

        let mut graph = SiteGraph::new();

        let mut stmt = self
            .conn
            .prepare("SELECT url, label, depth FROM pages WHERE run_id = ?1 ORDER BY position")?;
        let pages = stmt.query_map(params![run_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<u32>>(2)?,
            ))
        })?;
        for page in pages {
            let (url, label, depth) = page?;
            graph.add_node(&url, &label, depth);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT source, target FROM links WHERE run_id = ?1")?;
        let links = stmt.query_map(params![run_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for link in links {
            let (source, target) = link?;
            graph.add_edge(&source, &target);
        }

        Ok(graph)
    }

    // ===== Statistics =====

    fn count_pages(&self, run_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pages WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_links(&self, run_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM links WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn depth_breakdown(&self, run_id: i64) -> StorageResult<BTreeMap<u32, usize>> {
        let query = "
            SELECT depth, COUNT(*) as count
            FROM pages
            WHERE run_id = ?1 AND depth IS NOT NULL
            GROUP BY depth
            ORDER BY depth
        ";

        let mut stmt = self.conn.prepare(query)?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok((row.get::<_, u32>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut breakdown = BTreeMap::new();
        for row in rows {
            let (depth, count) = row?;
            breakdown.insert(depth, count as usize);
        }

        Ok(breakdown)
    }
}
