//! Statement location
//!
//! Finds the SQL most likely responsible for a lock. No single source
//! reliably has statement text for every lock-holding thread — statement
//! history may be disabled, the statement may have finished, or the owning
//! transaction may have run its SQL on a different monitored thread — so
//! lookup is a layered fallback over every source we have, ending at the
//! session's own current-statement text.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{SessionRecord, StatementRecord, ThreadMapping, TransactionRecord};

/// Upper bound on historical statements kept for audit display.
pub const RECENT_STATEMENT_LIMIT: usize = 5;

/// Which fallback tier produced an associated statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementOrigin {
    /// Currently executing on the lock's own thread.
    Current,
    /// From the thread's statement history.
    History,
    /// From another thread resolving to the same transaction.
    Transaction,
    /// From the session's processlist `info` text.
    Session,
}

/// A statement attributed to a lock, with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedStatement {
    /// Raw SQL text.
    pub sql_text: String,
    /// Statement event id, when the source had one.
    pub event_id: Option<u64>,
    /// When the statement started, when known.
    pub start_time: Option<DateTime<Utc>>,
    /// Which tier found it.
    pub origin: StatementOrigin,
}

impl AssociatedStatement {
    fn from_record(record: &StatementRecord, origin: StatementOrigin) -> Self {
        Self {
            sql_text: record.sql_text.clone(),
            event_id: Some(record.event_id),
            start_time: record.start_time,
            origin,
        }
    }
}

/// Result of statement location for one thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementChoice {
    /// Most relevant statement, if any source had one.
    pub statement: Option<AssociatedStatement>,
    /// Up to [`RECENT_STATEMENT_LIMIT`] recent statements for audit display.
    pub recent: Vec<AssociatedStatement>,
}

/// Index from thread id to resolved transaction id, built once per
/// snapshot and shared by every per-lock lookup.
#[must_use]
pub fn thread_transaction_index<'a>(
    threads: &'a [ThreadMapping],
    transactions: &'a [TransactionRecord],
) -> HashMap<u64, &'a str> {
    let mut by_session: HashMap<u64, &str> = HashMap::new();
    for tx in transactions {
        by_session
            .entry(tx.session_id)
            .or_insert(tx.transaction_id.as_str());
    }
    threads
        .iter()
        .filter_map(|t| {
            let session_id = t.session_id?;
            let tx_id = by_session.get(&session_id)?;
            Some((t.thread_id, *tx_id))
        })
        .collect()
}

/// Locate the statement(s) for one thread.
///
/// Priority: current statement on the thread, then its recent history,
/// then statements from sibling threads of the same transaction, then the
/// session's own `info` text, then nothing.
#[must_use]
pub fn locate_statement(
    thread_id: u64,
    current: &[StatementRecord],
    history: &[StatementRecord],
    thread_transactions: &HashMap<u64, &str>,
    session: Option<&SessionRecord>,
) -> StatementChoice {
    // Tier 1: currently executing on this thread (first in input order).
    if let Some(record) = current.iter().find(|s| s.thread_id == thread_id) {
        let recent = history
            .iter()
            .filter(|s| s.thread_id == thread_id)
            .take(RECENT_STATEMENT_LIMIT)
            .map(|s| AssociatedStatement::from_record(s, StatementOrigin::History))
            .collect();
        return StatementChoice {
            statement: Some(AssociatedStatement::from_record(
                record,
                StatementOrigin::Current,
            )),
            recent,
        };
    }

    // Tier 2: the thread's own history, most recent first.
    let own_history: Vec<AssociatedStatement> = history
        .iter()
        .filter(|s| s.thread_id == thread_id)
        .take(RECENT_STATEMENT_LIMIT)
        .map(|s| AssociatedStatement::from_record(s, StatementOrigin::History))
        .collect();
    if let Some(first) = own_history.first() {
        return StatementChoice {
            statement: Some(first.clone()),
            recent: own_history,
        };
    }

    // Tier 3: sibling threads resolving to the same transaction. Covers
    // locks whose owning transaction executed its SQL on a different
    // monitored thread than the one holding the lock.
    if let Some(tx_id) = thread_transactions.get(&thread_id) {
        let sibling = |s: &&StatementRecord| {
            s.thread_id != thread_id
                && thread_transactions.get(&s.thread_id) == Some(tx_id)
        };
        let pooled: Vec<AssociatedStatement> = current
            .iter()
            .filter(sibling)
            .chain(history.iter().filter(sibling))
            .take(RECENT_STATEMENT_LIMIT)
            .map(|s| AssociatedStatement::from_record(s, StatementOrigin::Transaction))
            .collect();
        if let Some(first) = pooled.first() {
            return StatementChoice {
                statement: Some(first.clone()),
                recent: pooled,
            };
        }
    }

    // Tier 4: the session's own current-statement text.
    if let Some(info) = session.and_then(|s| s.info.as_deref()) {
        return StatementChoice {
            statement: Some(AssociatedStatement {
                sql_text: info.to_string(),
                event_id: None,
                start_time: None,
                origin: StatementOrigin::Session,
            }),
            recent: Vec::new(),
        };
    }

    // Tier 5: nothing anywhere. A valid terminal state.
    StatementChoice::default()
}
