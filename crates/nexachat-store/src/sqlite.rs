//! SQLite implementation of the BlobStore trait.
//!
//! This is the persistent backend. It uses rusqlite with bundled SQLite,
//! wrapped in async via tokio::spawn_blocking. Several contexts may open the
//! same database file; each write is a single upsert statement, so a value
//! is replaced atomically.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::BlobStore;

/// How long a writer waits for another connection's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Blob store kept in one SQLite table.
///
/// Clones share a single connection behind a mutex; queries run on tokio's
/// blocking pool.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path` and bring its schema
    /// up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        tracing::debug!(path = %path.display(), "opened sqlite blob store");
        Self::with_schema(conn)
    }

    /// A private database that disappears with the store.
    pub fn open_memory() -> Result<Self> {
        Self::with_schema(Connection::open_in_memory()?)
    }

    fn with_schema(mut conn: Connection) -> Result<Self> {
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(format!("sqlite connection: {}", e)))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(format!("spawn_blocking failed: {}", e)))?
    }
}

#[async_trait]
impl BlobStore for SqliteStore {
    async fn get_blob(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();

        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT value FROM blobs WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn put_blob(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                params![key, value, migration::now_millis()],
            )?;
            Ok(())
        })
        .await
    }

    async fn remove_blob(&self, key: &str) -> Result<()> {
        let key = key.to_string();

        self.with_conn(move |conn| {
            conn.execute("DELETE FROM blobs WHERE key = ?1", params![key])?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get_blob() {
        let store = SqliteStore::open_memory().unwrap();

        assert_eq!(store.get_blob("chatMessages").await.unwrap(), None);

        store.put_blob("chatMessages", "[]").await.unwrap();
        assert_eq!(
            store.get_blob("chatMessages").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = SqliteStore::open_memory().unwrap();

        store.put_blob("k", "first").await.unwrap();
        store.put_blob("k", "second").await.unwrap();

        assert_eq!(store.get_blob("k").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_remove_blob() {
        let store = SqliteStore::open_memory().unwrap();

        store.put_blob("k", "v").await.unwrap();
        store.remove_blob("k").await.unwrap();
        assert_eq!(store.get_blob("k").await.unwrap(), None);

        // Removing again is fine
        store.remove_blob("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.put_blob("k", "durable").await.unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(
            reopened.get_blob("k").await.unwrap().as_deref(),
            Some("durable")
        );
    }

    #[tokio::test]
    async fn test_two_connections_share_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.db");

        let a = SqliteStore::open(&path).unwrap();
        let b = SqliteStore::open(&path).unwrap();

        a.put_blob("k", "from a").await.unwrap();
        assert_eq!(b.get_blob("k").await.unwrap().as_deref(), Some("from a"));

        b.put_blob("k", "from b").await.unwrap();
        assert_eq!(a.get_blob("k").await.unwrap().as_deref(), Some("from b"));
    }
}
