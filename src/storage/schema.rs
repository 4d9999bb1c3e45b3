//! Database schema definitions
//!
//! Each run stores one snapshot of its graph: the node list in insertion order
//! and the edge list.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    start_url TEXT NOT NULL,
    status TEXT NOT NULL
);

-- Graph nodes per run
CREATE TABLE IF NOT EXISTS pages (
    run_id INTEGER NOT NULL REFERENCES runs(id),
    url TEXT NOT NULL,
    label TEXT NOT NULL,
    depth INTEGER,
    position INTEGER NOT NULL,
    PRIMARY KEY (run_id, url)
);

CREATE INDEX IF NOT EXISTS idx_pages_position ON pages(run_id, position);

-- Graph edges per run
CREATE TABLE IF NOT EXISTS links (
    run_id INTEGER NOT NULL REFERENCES runs(id),
    source TEXT NOT NULL,
    target TEXT NOT NULL,
    PRIMARY KEY (run_id, source, target)
);

CREATE INDEX IF NOT EXISTS idx_links_target ON links(run_id, target);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
