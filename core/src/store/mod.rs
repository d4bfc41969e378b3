//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Generators hand finished tables to store methods; they never execute
//! SQL directly. Rows are written in boundary form (`YYYY-MM-DD` dates,
//! `Yes`/`No` flags).

use crate::error::GenResult;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

mod activity;
mod merchant;

pub struct DatasetStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

/// Run metadata as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub run_id: String,
    pub seed: u64,
    pub merchant_count: usize,
    pub as_of: String,
    pub version: String,
}

impl DatasetStore {
    pub fn open(path: &str) -> GenResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GenResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GenResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_dataset.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: u64,
        merchant_count: usize,
        as_of: NaiveDate,
        version: &str,
    ) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, merchant_count, as_of, version)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                run_id,
                seed as i64,
                merchant_count as i64,
                as_of.format(crate::types::DATE_FORMAT).to_string(),
                version
            ],
        )?;
        Ok(())
    }

    pub fn get_run(&self, run_id: &str) -> GenResult<Option<RunRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT run_id, seed, merchant_count, as_of, version FROM run WHERE run_id = ?1",
                params![run_id],
                |r| {
                    Ok(RunRecord {
                        run_id: r.get(0)?,
                        seed: r.get::<_, i64>(1)? as u64,
                        merchant_count: r.get::<_, i64>(2)? as usize,
                        as_of: r.get(3)?,
                        version: r.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn count_rows(&self, table: &str, run_id: &str) -> GenResult<i64> {
        Ok(self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE run_id = ?1"),
            params![run_id],
            |r| r.get(0),
        )?)
    }
}
