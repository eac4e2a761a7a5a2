//! Raw snapshot records as delivered by the introspection source
//!
//! These mirror the shapes of the underlying views (`data_locks`,
//! `threads`, `innodb_trx`, `processlist`, statement event tables). All
//! records are point-in-time snapshot data: identity is structural, nothing
//! is guaranteed stable across polls, and the engine treats every batch as
//! read-only input.
//!
//! Missing fields are the norm, not the exception — a thread without a
//! client session, a lock without a transaction id, a statement without an
//! end time. Every such absence deserializes to `None` and stays `None`
//! through enrichment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a lock is held or still being waited for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockStatus {
    /// The lock is held by its owner.
    Granted,
    /// The owner is blocked waiting for the lock.
    Waiting,
}

/// Granularity of a lock as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockType {
    /// Table-level lock (covers the whole table).
    Table,
    /// Record-level lock (row, gap, or insert-intention).
    Record,
    /// Anything the source reports that we don't model.
    #[serde(untagged)]
    Other(String),
}

/// One row of the engine's lock view.
///
/// No primary key is guaranteed by the source; two polls may report the
/// "same" lock with different transient ids. Correlation therefore never
/// assumes record identity across snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// Storage engine that owns the lock (e.g. "INNODB").
    pub engine: String,
    /// Engine-internal transaction id; opaque and not stable across polls.
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Internal thread that holds or requests the lock.
    pub thread_id: u64,
    /// Schema of the locked object.
    pub object_schema: String,
    /// Name of the locked object.
    pub object_name: String,
    /// Index the lock applies to, when record-level.
    #[serde(default)]
    pub index_name: Option<String>,
    /// Lock granularity.
    pub lock_type: LockType,
    /// Comma-separated mode token set, e.g. "X,REC_NOT_GAP" or "IS".
    pub lock_mode: String,
    /// Held or waiting.
    pub lock_status: LockStatus,
    /// Opaque description of the locked key or gap, when record-level.
    #[serde(default)]
    pub lock_data: Option<String>,
}

impl LockRecord {
    /// Mode tokens, split on commas. "X,REC_NOT_GAP" → ["X", "REC_NOT_GAP"].
    pub fn mode_tokens(&self) -> impl Iterator<Item = &str> {
        self.lock_mode.split(',').map(str::trim)
    }

    /// Canonical key string identifying what the lock covers, used for
    /// wait-edge correlation: schema, object, index, and key data.
    #[must_use]
    pub fn lock_key(&self) -> String {
        format!(
            "{}.{}:{}:{}",
            self.object_schema,
            self.object_name,
            self.index_name.as_deref().unwrap_or("-"),
            self.lock_data.as_deref().unwrap_or("-"),
        )
    }
}

/// Maps an internal thread to its client session, when one exists.
///
/// Background threads have no session; that is a terminal state for
/// resolution, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMapping {
    /// Internal thread id.
    pub thread_id: u64,
    /// Client session (processlist) id, absent for background threads.
    #[serde(default)]
    pub session_id: Option<u64>,
    /// Thread name as reported by the source.
    #[serde(default)]
    pub name: String,
}

/// One active transaction. A session has at most one per snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Engine transaction id.
    pub transaction_id: String,
    /// Owning client session id.
    pub session_id: u64,
    /// When the transaction started.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Seconds since the transaction started.
    #[serde(default)]
    pub duration_seconds: u64,
    /// Transaction state as reported (e.g. "RUNNING", "LOCK WAIT").
    #[serde(default)]
    pub state: String,
    /// When the transaction began waiting for a lock, if it is.
    #[serde(default)]
    pub wait_started_at: Option<DateTime<Utc>>,
}

/// One client session (a processlist row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Client session id.
    pub session_id: u64,
    /// Authenticated user.
    #[serde(default)]
    pub user: String,
    /// Client host.
    #[serde(default)]
    pub host: String,
    /// Default database, if selected.
    #[serde(default)]
    pub db: Option<String>,
    /// Command type (e.g. "Query", "Sleep").
    #[serde(default)]
    pub command: String,
    /// Seconds the session has been in its current command.
    #[serde(default)]
    pub elapsed_seconds: u64,
    /// Session state text.
    #[serde(default)]
    pub state: Option<String>,
    /// Currently executing statement text, if any.
    #[serde(default)]
    pub info: Option<String>,
}

/// One statement event, current or historical.
///
/// History batches arrive ordered most-recent-first; the engine preserves
/// that ordering and never re-sorts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRecord {
    /// Thread that executed the statement.
    pub thread_id: u64,
    /// Event id within the thread's statement stream.
    pub event_id: u64,
    /// When the statement started.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// When the statement finished; `None` while still running.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Raw SQL text.
    pub sql_text: String,
    /// Normalized digest text, when collected.
    #[serde(default)]
    pub digest_text: Option<String>,
    /// Default schema at execution time.
    #[serde(default)]
    pub schema: Option<String>,
}
