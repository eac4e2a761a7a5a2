//! Wait-for graph construction
//!
//! Produces the blocking/blocked relationships between transactions. When
//! the source exposes a direct wait-relationship view its rows pass
//! through unchanged; when that view is empty, absent, or failed, edges
//! are derived by self-joining the lock batch on co-located keys.
//!
//! The fallback over-approximates: co-location on the same key or gap is
//! used as a proxy for a true lock conflict, without modelling mode
//! compatibility (two shared locks on one key would be reported). It only
//! runs when the authoritative view is unavailable.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{LockRecord, LockStatus};

/// A directed wait-for relationship: the waiting transaction is blocked
/// on a lock held by the blocking transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitEdge {
    /// Transaction that is blocked.
    #[serde(default)]
    pub waiting_transaction_id: Option<String>,
    /// Thread of the blocked side.
    pub waiting_thread_id: u64,
    /// Statement event id of the blocked side, when the source had one.
    #[serde(default)]
    pub waiting_event_id: Option<u64>,
    /// Key description of the requested lock.
    pub waiting_lock_key: String,
    /// Transaction holding the contended lock.
    #[serde(default)]
    pub blocking_transaction_id: Option<String>,
    /// Thread of the holding side.
    pub blocking_thread_id: u64,
    /// Statement event id of the holding side, when the source had one.
    #[serde(default)]
    pub blocking_event_id: Option<u64>,
    /// Key description of the held lock.
    pub blocking_lock_key: String,
}

/// Build the wait-edge set for one snapshot.
///
/// Direct rows win when present and non-empty; otherwise the heuristic
/// self-join over the lock batch runs. Both sources empty yields an empty
/// set, never an error.
#[must_use]
pub fn build_wait_edges(direct: Option<&[WaitEdge]>, locks: &[LockRecord]) -> Vec<WaitEdge> {
    match direct {
        Some(rows) if !rows.is_empty() => rows.to_vec(),
        _ => {
            let edges = derive_from_locks(locks);
            if !edges.is_empty() {
                debug!(
                    edge_count = edges.len(),
                    "derived wait edges from lock co-location fallback"
                );
            }
            edges
        }
    }
}

/// Heuristic fallback: every (waiting, granted) pair co-located on the
/// same schema/object/index/key with differing transaction ids becomes an
/// edge. Null index and key compare as equal to null.
fn derive_from_locks(locks: &[LockRecord]) -> Vec<WaitEdge> {
    let mut edges = Vec::new();
    for waiting in locks.iter().filter(|l| l.lock_status == LockStatus::Waiting) {
        for granted in locks.iter().filter(|l| l.lock_status == LockStatus::Granted) {
            if waiting.object_schema == granted.object_schema
                && waiting.object_name == granted.object_name
                && waiting.index_name == granted.index_name
                && waiting.lock_data == granted.lock_data
                && waiting.transaction_id != granted.transaction_id
            {
                edges.push(WaitEdge {
                    waiting_transaction_id: waiting.transaction_id.clone(),
                    waiting_thread_id: waiting.thread_id,
                    waiting_event_id: None,
                    waiting_lock_key: waiting.lock_key(),
                    blocking_transaction_id: granted.transaction_id.clone(),
                    blocking_thread_id: granted.thread_id,
                    blocking_event_id: None,
                    blocking_lock_key: granted.lock_key(),
                });
            }
        }
    }
    edges
}

/// Number of distinct transactions currently blocked by someone.
#[must_use]
pub fn blocked_count(edges: &[WaitEdge]) -> usize {
    let blocked: std::collections::BTreeSet<&str> = edges
        .iter()
        .filter_map(|e| e.waiting_transaction_id.as_deref())
        .collect();
    blocked.len()
}

/// Transactions that block others while waiting on nobody themselves —
/// the heads of blocking chains, sorted and deduplicated.
#[must_use]
pub fn root_blockers(edges: &[WaitEdge]) -> Vec<String> {
    let mut roots: Vec<String> = edges
        .iter()
        .filter_map(|e| e.blocking_transaction_id.as_deref())
        .filter(|candidate| {
            !edges
                .iter()
                .any(|e| e.waiting_transaction_id.as_deref() == Some(candidate))
        })
        .map(str::to_string)
        .collect();
    roots.sort();
    roots.dedup();
    roots
}
