//! Versioned SQLite schema for the blob backend.
//!
//! Applied versions are recorded in `schema_migrations`. Every step is
//! written so that two connections racing on a fresh file both succeed.

use rusqlite::{params, Connection, Transaction};

use crate::error::{Result, StoreError};

/// One schema step, taking the database from `version - 1` to `version`.
struct Step {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[Step] = &[Step {
    version: 1,
    name: "blobs",
    sql: "CREATE TABLE IF NOT EXISTS blobs (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL,
              updated_at INTEGER NOT NULL   -- unix ms of the last write
          );",
}];

/// Schema version this build expects.
pub const CURRENT_VERSION: u32 = 1;

/// Bring the schema at `conn` up to [`CURRENT_VERSION`].
///
/// A database written by a newer build is rejected rather than touched.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL
         );",
    )?;

    let applied = applied_version(conn)?;
    if applied > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema v{} is newer than supported v{}",
            applied, CURRENT_VERSION
        )));
    }

    let pending: Vec<&Step> = STEPS.iter().filter(|s| s.version > applied).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        run_step(&tx, step)?;
    }
    tx.commit()?;

    tracing::debug!(from = applied, to = CURRENT_VERSION, "migrated blob schema");
    Ok(())
}

/// Highest recorded schema version, 0 for a fresh database.
pub fn applied_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn run_step(tx: &Transaction<'_>, step: &Step) -> Result<()> {
    tx.execute_batch(step.sql)
        .map_err(|e| StoreError::Migration(format!("v{} ({}): {}", step.version, step.name, e)))?;
    tx.execute(
        "INSERT OR IGNORE INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
        params![step.version, now_millis()],
    )?;
    Ok(())
}

/// Wall-clock milliseconds since the Unix epoch, 0 if the clock is before it.
pub(crate) fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
