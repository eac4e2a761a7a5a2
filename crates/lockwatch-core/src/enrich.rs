//! Lock enrichment
//!
//! Combines classification, session resolution, and statement location
//! into one enriched record per raw lock. An independent per-record map:
//! output order matches input order, no record depends on any other, and
//! every input lock produces exactly one output — nothing is fabricated
//! or dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{self, LockClassification};
use crate::model::{
    LockRecord, SessionRecord, StatementRecord, ThreadMapping, TransactionRecord,
};
use crate::resolve::resolve_session;
use crate::statement::{
    AssociatedStatement, locate_statement, thread_transaction_index,
};

/// One lock with everything the operator view needs: the raw record,
/// its owning session/transaction, the SQL behind it, and its
/// classification. Optional fields stay `None` when the snapshot had no
/// matching data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedLock {
    /// The raw lock record, untouched.
    #[serde(flatten)]
    pub lock: LockRecord,
    /// Owning client session, when resolvable.
    pub session_id: Option<u64>,
    /// How long the lock has plausibly been held: transaction duration,
    /// else session command time, else 0.
    pub lock_duration_seconds: u64,
    /// When the owning transaction started.
    pub transaction_started_at: Option<DateTime<Utc>>,
    /// State of the owning transaction.
    pub transaction_state: Option<String>,
    /// Session user.
    pub user: Option<String>,
    /// Session host.
    pub host: Option<String>,
    /// Session default database.
    pub db: Option<String>,
    /// Session command type.
    pub command: Option<String>,
    /// Session state text.
    pub session_state: Option<String>,
    /// SQL attributed to this lock, if any source had it.
    pub statement: Option<AssociatedStatement>,
    /// Up to five recent statements for audit display.
    pub recent_statements: Vec<AssociatedStatement>,
    /// Semantic classification.
    pub classification: LockClassification,
}

/// Enrich every lock record in the snapshot. Total: empty auxiliary
/// batches yield enriched locks with all optional fields `None` and a
/// duration of zero.
#[must_use]
pub fn enrich_locks(
    locks: &[LockRecord],
    threads: &[ThreadMapping],
    transactions: &[TransactionRecord],
    sessions: &[SessionRecord],
    statements_current: &[StatementRecord],
    statements_history: &[StatementRecord],
) -> Vec<EnrichedLock> {
    let tx_index = thread_transaction_index(threads, transactions);

    locks
        .iter()
        .map(|lock| {
            let ctx = resolve_session(lock.thread_id, threads, transactions, sessions);
            let duration = ctx
                .transaction
                .map(|tx| tx.duration_seconds)
                .or_else(|| ctx.session.map(|s| s.elapsed_seconds))
                .unwrap_or(0);
            let choice = locate_statement(
                lock.thread_id,
                statements_current,
                statements_history,
                &tx_index,
                ctx.session,
            );

            EnrichedLock {
                lock: lock.clone(),
                session_id: ctx.session_id,
                lock_duration_seconds: duration,
                transaction_started_at: ctx.transaction.and_then(|tx| tx.started_at),
                transaction_state: ctx.transaction.map(|tx| tx.state.clone()),
                user: ctx.session.map(|s| s.user.clone()),
                host: ctx.session.map(|s| s.host.clone()),
                db: ctx.session.and_then(|s| s.db.clone()),
                command: ctx.session.map(|s| s.command.clone()),
                session_state: ctx.session.and_then(|s| s.state.clone()),
                statement: choice.statement,
                recent_statements: choice.recent,
                classification: classify::classify(lock),
            }
        })
        .collect()
}
