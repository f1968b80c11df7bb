//! SQLite storage implementation

use crate::model::{PageOutcome, Song};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::storage::FailedPage;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path` and initializes the schema
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    // ===== Songs =====

    fn song_exists(&self, number: &str) -> StorageResult<bool> {
        let id: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM songs WHERE number = ?1 LIMIT 1",
                params![number],
                |row| row.get(0),
            )
            .optional()?;

        Ok(id.is_some())
    }

    fn insert_song(&mut self, song: &Song) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO songs (
                page_number,
                artist_name, artist_name_k, artist_name_r,
                lyric_writer_name, lyric_writer_name_k, lyric_writer_name_r,
                song_writer_name, song_writer_name_k, song_writer_name_r,
                name, name_k, name_r,
                number, original_key, delivery_status, delivery_term,
                model_names, lyric, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                       ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
            params![
                song.page_number,
                song.artist_name,
                song.artist_name_k,
                song.artist_name_r,
                song.lyric_writer_name,
                song.lyric_writer_name_k,
                song.lyric_writer_name_r,
                song.song_writer_name,
                song.song_writer_name_k,
                song.song_writer_name_r,
                song.name,
                song.name_k,
                song.name_r,
                song.number,
                song.original_key,
                song.delivery_status,
                song.delivery_term,
                song.model_names,
                song.lyric,
                now,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn count_songs(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Audit log =====

    fn append_log(&mut self, page_number: u32, outcome: PageOutcome) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO crawl_log (page_number, outcome, logged_at) VALUES (?1, ?2, ?3)",
            params![page_number, outcome.to_db_string(), now],
        )?;
        Ok(())
    }

    fn last_logged_page(&self) -> StorageResult<Option<u32>> {
        let page: Option<u32> = self
            .conn
            .query_row(
                "SELECT page_number FROM crawl_log ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        Ok(page)
    }

    fn count_log_entries(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM crawl_log", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn outcome_breakdown(&self) -> StorageResult<HashMap<PageOutcome, u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT outcome, COUNT(*) FROM crawl_log GROUP BY outcome")?;

        let mut breakdown = HashMap::new();
        let rows = stmt.query_map([], |row| {
            let outcome_str: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((outcome_str, count))
        })?;

        for row in rows {
            let (outcome_str, count) = row?;
            if let Some(outcome) = PageOutcome::from_db_string(&outcome_str) {
                breakdown.insert(outcome, count as u64);
            }
        }

        Ok(breakdown)
    }

    // ===== Failed pages =====

    fn quarantine(&mut self, page_number: u32, reason: PageOutcome) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO failed_pages (page_number, reason, recorded_at) VALUES (?1, ?2, ?3)",
            params![page_number, reason.to_db_string(), now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn retire_failed_page(&mut self, failed_page_id: i64) -> StorageResult<()> {
        self.conn.execute(
            "DELETE FROM failed_pages WHERE id = ?1",
            params![failed_page_id],
        )?;
        Ok(())
    }

    fn failed_pages_in_range(&self, start_id: i64, end_id: i64) -> StorageResult<Vec<FailedPage>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, page_number, reason, recorded_at FROM failed_pages
             WHERE ?1 <= id AND id < ?2 ORDER BY id ASC",
        )?;

        let pages = stmt
            .query_map(params![start_id, end_id], |row| {
                let reason_str: String = row.get(2)?;
                Ok(FailedPage {
                    id: row.get(0)?,
                    page_number: row.get(1)?,
                    reason: PageOutcome::from_db_string(&reason_str)
                        .unwrap_or(PageOutcome::GetSongsFailed),
                    recorded_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pages)
    }

    fn count_failed_pages(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM failed_pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
