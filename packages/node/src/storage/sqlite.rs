//! SQLite-backed storage implementation.
//!
//! Uses `rusqlite` (with bundled SQLite) wrapped in an `Arc<Mutex<Connection>>`
//! to satisfy the `Send + Sync` requirements. All blocking calls are offloaded
//! to a thread-pool via `tokio::task::spawn_blocking`. Every statement is
//! parameterised; no user input is ever spliced into SQL text.
//!
//! # Schema
//!
//! - `users` — one row per registered email.
//! - `relations` — directed `(owner_id, counterpart_id, status)` rows. No
//!   uniqueness constraint: the table is an append-only log of writes.

use std::sync::{Arc, Mutex, MutexGuard};

use amity::{RelationStatus, UserId};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::{IdentityResolver, RelationStore, StorageError};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id     INTEGER PRIMARY KEY AUTOINCREMENT,
    email  TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS relations (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id        INTEGER NOT NULL REFERENCES users(id),
    counterpart_id  INTEGER NOT NULL REFERENCES users(id),
    status          TEXT NOT NULL CHECK (status IN ('FRIEND', 'SUBSCRIBE', 'BLOCK'))
);
CREATE INDEX IF NOT EXISTS idx_relations_pair
    ON relations(owner_id, counterpart_id, status);
CREATE INDEX IF NOT EXISTS idx_relations_counterpart
    ON relations(counterpart_id, status);
";

// ---------------------------------------------------------------------------
// SqliteStorage
// ---------------------------------------------------------------------------

/// SQLite-backed implementation of [`super::Storage`].
///
/// Holds a single database connection protected by a `Mutex`. All operations
/// run inside `spawn_blocking` to avoid blocking the async runtime.
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Open (or create) the SQLite database at `path` and apply the schema.
    pub fn open(path: &str) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database (data is lost when dropped).
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking thread-pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            f(&conn)
        })
        .await
        .map_err(|e| StorageError::Task(format!("task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// Error conversions
// ---------------------------------------------------------------------------

fn map_err(e: rusqlite::Error) -> StorageError {
    StorageError::Internal(e.to_string())
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, StorageError> {
    conn.lock()
        .map_err(|_| StorageError::Internal("sqlite connection lock poisoned".into()))
}

fn collect_emails(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn.prepare(sql).map_err(map_err)?;
    let emails = stmt
        .query_map(params, |row| row.get::<_, String>(0))
        .map_err(map_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_err)?;
    Ok(emails)
}

// ---------------------------------------------------------------------------
// Storage impl
// ---------------------------------------------------------------------------

#[async_trait]
impl IdentityResolver for SqliteStorage {
    async fn resolve(&self, email: &str) -> Result<Option<UserId>, StorageError> {
        let email = email.to_string();
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT id FROM users WHERE email = ?1",
                params![email],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .map(|id| id.map(UserId))
            .map_err(map_err)
        })
        .await
    }

    async fn register(&self, email: &str) -> Result<UserId, StorageError> {
        let email = email.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO users (email) VALUES (?1) ON CONFLICT(email) DO NOTHING",
                params![email],
            )
            .map_err(map_err)?;
            conn.query_row(
                "SELECT id FROM users WHERE email = ?1",
                params![email],
                |row| row.get::<_, i64>(0),
            )
            .map(UserId)
            .map_err(map_err)
        })
        .await
    }
}

#[async_trait]
impl RelationStore for SqliteStorage {
    async fn exists(
        &self,
        a: UserId,
        b: UserId,
        status: RelationStatus,
    ) -> Result<bool, StorageError> {
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT EXISTS (
                     SELECT 1 FROM relations
                     WHERE ((owner_id = ?1 AND counterpart_id = ?2)
                         OR (owner_id = ?2 AND counterpart_id = ?1))
                       AND status = ?3
                 )",
                params![a.0, b.0, status.as_str()],
                |row| row.get::<_, bool>(0),
            )
            .map_err(map_err)
        })
        .await
    }

    async fn exists_directed(
        &self,
        owner: UserId,
        counterpart: UserId,
        status: RelationStatus,
    ) -> Result<bool, StorageError> {
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT EXISTS (
                     SELECT 1 FROM relations
                     WHERE owner_id = ?1 AND counterpart_id = ?2 AND status = ?3
                 )",
                params![owner.0, counterpart.0, status.as_str()],
                |row| row.get::<_, bool>(0),
            )
            .map_err(map_err)
        })
        .await
    }

    async fn friends_with_status(
        &self,
        user: UserId,
        status: RelationStatus,
    ) -> Result<Vec<String>, StorageError> {
        self.with_conn(move |conn| {
            collect_emails(
                conn,
                "SELECT DISTINCT u.email
                 FROM relations r
                 JOIN users u
                   ON (r.owner_id = ?1 AND u.id = r.counterpart_id)
                   OR (r.counterpart_id = ?1 AND u.id = r.owner_id)
                 WHERE r.status = ?2 AND u.id != ?1
                 ORDER BY u.email ASC",
                params![user.0, status.as_str()],
            )
        })
        .await
    }

    async fn notifiable_senders(&self, target: UserId) -> Result<Vec<String>, StorageError> {
        self.with_conn(move |conn| {
            collect_emails(
                conn,
                "SELECT DISTINCT u.email
                 FROM relations r
                 JOIN users u ON u.id = r.owner_id
                 WHERE r.counterpart_id = ?1
                   AND r.owner_id != ?1
                   AND r.status IN ('FRIEND', 'SUBSCRIBE')
                   AND NOT EXISTS (
                       SELECT 1 FROM relations b
                       WHERE b.status = 'BLOCK'
                         AND ((b.owner_id = r.owner_id AND b.counterpart_id = ?1)
                           OR (b.owner_id = ?1 AND b.counterpart_id = r.owner_id))
                   )
                 ORDER BY u.email ASC",
                params![target.0],
            )
        })
        .await
    }

    async fn insert_relation(
        &self,
        owner: UserId,
        counterpart: UserId,
        status: RelationStatus,
    ) -> Result<(), StorageError> {
        self.with_conn(move |conn| {
            // A single multi-row INSERT is atomic: both FRIEND rows or neither.
            let sql = if status.is_symmetric() {
                "INSERT INTO relations (owner_id, counterpart_id, status)
                 VALUES (?1, ?2, ?3), (?2, ?1, ?3)"
            } else {
                "INSERT INTO relations (owner_id, counterpart_id, status)
                 VALUES (?1, ?2, ?3)"
            };
            conn.execute(sql, params![owner.0, counterpart.0, status.as_str()])
                .map_err(map_err)?;
            Ok(())
        })
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
