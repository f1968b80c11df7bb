//! Database schema definitions
//!
//! All SQL schema for the Songweir database lives here. Tables are created
//! idempotently at startup; failure aborts the process before crawling.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Harvested songs, deduplicated by catalog number
CREATE TABLE IF NOT EXISTS songs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_number INTEGER NOT NULL,
    artist_name TEXT NOT NULL,
    artist_name_k TEXT NOT NULL DEFAULT '',
    artist_name_r TEXT NOT NULL DEFAULT '',
    lyric_writer_name TEXT NOT NULL DEFAULT '',
    lyric_writer_name_k TEXT NOT NULL DEFAULT '',
    lyric_writer_name_r TEXT NOT NULL DEFAULT '',
    song_writer_name TEXT NOT NULL DEFAULT '',
    song_writer_name_k TEXT NOT NULL DEFAULT '',
    song_writer_name_r TEXT NOT NULL DEFAULT '',
    name TEXT NOT NULL,
    name_k TEXT NOT NULL DEFAULT '',
    name_r TEXT NOT NULL DEFAULT '',
    number TEXT NOT NULL,
    original_key TEXT NOT NULL DEFAULT '',
    delivery_status TEXT NOT NULL DEFAULT '',
    delivery_term TEXT NOT NULL DEFAULT '',
    model_names TEXT NOT NULL DEFAULT '',
    lyric TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_songs_number ON songs(number);
CREATE INDEX IF NOT EXISTS idx_songs_page_number ON songs(page_number);

-- Append-only audit log; the newest entry is the resume cursor
CREATE TABLE IF NOT EXISTS crawl_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_number INTEGER NOT NULL,
    outcome TEXT NOT NULL,
    logged_at TEXT NOT NULL
);

-- Quarantined pages pending reconciliation; rows are only ever
-- inserted or deleted, never updated
CREATE TABLE IF NOT EXISTS failed_pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_number INTEGER NOT NULL,
    reason TEXT NOT NULL,
    recorded_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
