//! Snapshot assembly
//!
//! The single entry point of the correlation engine: one point-in-time
//! bundle of introspection batches in, one unified result out. Pure —
//! the engine holds no state between invocations, and the timestamp comes
//! from the input, never from the clock, so the same input always yields
//! the same output.
//!
//! Batches are only best-effort temporally consistent; the source system
//! offers no transactional consistency across its views. Minor skew
//! between batches, and entirely missing batches, are valid inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enrich::{EnrichedLock, enrich_locks};
use crate::model::{
    LockRecord, SessionRecord, StatementRecord, ThreadMapping, TransactionRecord,
};
use crate::wait_graph::{WaitEdge, build_wait_edges};

/// Everything a source delivers for one snapshot request. Any batch may
/// be empty when the underlying view is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotInput {
    /// When the batches were captured.
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
    /// Lock view rows.
    #[serde(default)]
    pub locks: Vec<LockRecord>,
    /// Thread-to-session mappings.
    #[serde(default)]
    pub threads: Vec<ThreadMapping>,
    /// Active transactions.
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    /// Client sessions (processlist).
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    /// Currently executing statements.
    #[serde(default)]
    pub statements_current: Vec<StatementRecord>,
    /// Statement history, most recent first.
    #[serde(default)]
    pub statements_history: Vec<StatementRecord>,
    /// Direct wait-relationship rows, when the source supports them.
    #[serde(default)]
    pub wait_edges: Option<Vec<WaitEdge>>,
}

/// The unified operator-facing result for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Timestamp carried over from the input.
    pub captured_at: Option<DateTime<Utc>>,
    /// One enriched record per input lock, in input order.
    pub locks: Vec<EnrichedLock>,
    /// Who waits on whom.
    pub wait_edges: Vec<WaitEdge>,
    /// Sessions, passed through for the overview.
    pub sessions: Vec<SessionRecord>,
    /// Transactions, passed through for the overview.
    pub transactions: Vec<TransactionRecord>,
}

/// Correlate one snapshot's batches into the unified result.
#[must_use]
pub fn correlate(input: &SnapshotInput) -> Snapshot {
    let locks = enrich_locks(
        &input.locks,
        &input.threads,
        &input.transactions,
        &input.sessions,
        &input.statements_current,
        &input.statements_history,
    );
    let wait_edges = build_wait_edges(input.wait_edges.as_deref(), &input.locks);

    debug!(
        lock_count = locks.len(),
        wait_edge_count = wait_edges.len(),
        session_count = input.sessions.len(),
        "correlated snapshot"
    );

    Snapshot {
        captured_at: input.captured_at,
        locks,
        wait_edges,
        sessions: input.sessions.clone(),
        transactions: input.transactions.clone(),
    }
}
