//! Session resolution
//!
//! Joins an internal thread id to its client session, and the session to
//! its active transaction and processlist row. All three lookups are
//! independent and best-effort: a thread with no session is terminal, a
//! session with no transaction is a perfectly valid partial resolution.

use crate::model::{SessionRecord, ThreadMapping, TransactionRecord};

/// Resolved context for one thread, borrowed from the snapshot batches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionContext<'a> {
    /// Client session id, if the thread has one.
    pub session_id: Option<u64>,
    /// Active transaction for the session, if any.
    pub transaction: Option<&'a TransactionRecord>,
    /// Processlist row for the session, if any.
    pub session: Option<&'a SessionRecord>,
}

/// Resolve one thread against the full snapshot batches.
///
/// Partial resolution is preserved as-is: finding a session but no
/// transaction leaves `transaction` as `None` and is not a failure.
#[must_use]
pub fn resolve_session<'a>(
    thread_id: u64,
    threads: &'a [ThreadMapping],
    transactions: &'a [TransactionRecord],
    sessions: &'a [SessionRecord],
) -> SessionContext<'a> {
    let Some(session_id) = threads
        .iter()
        .find(|t| t.thread_id == thread_id)
        .and_then(|t| t.session_id)
    else {
        return SessionContext::default();
    };

    SessionContext {
        session_id: Some(session_id),
        transaction: transactions.iter().find(|t| t.session_id == session_id),
        session: sessions.iter().find(|s| s.session_id == session_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(thread_id: u64, session_id: Option<u64>) -> ThreadMapping {
        ThreadMapping {
            thread_id,
            session_id,
            name: "thread/sql/one_connection".to_string(),
        }
    }

    fn transaction(transaction_id: &str, session_id: u64) -> TransactionRecord {
        TransactionRecord {
            transaction_id: transaction_id.to_string(),
            session_id,
            started_at: None,
            duration_seconds: 12,
            state: "RUNNING".to_string(),
            wait_started_at: None,
        }
    }

    fn session(session_id: u64) -> SessionRecord {
        SessionRecord {
            session_id,
            user: "app".to_string(),
            host: "10.0.0.5:52011".to_string(),
            db: Some("shop".to_string()),
            command: "Query".to_string(),
            elapsed_seconds: 3,
            state: None,
            info: None,
        }
    }

    #[test]
    fn full_resolution() {
        let threads = [mapping(48, Some(9))];
        let transactions = [transaction("T1", 9)];
        let sessions = [session(9)];
        let ctx = resolve_session(48, &threads, &transactions, &sessions);
        assert_eq!(ctx.session_id, Some(9));
        assert_eq!(ctx.transaction.unwrap().transaction_id, "T1");
        assert_eq!(ctx.session.unwrap().session_id, 9);
    }

    #[test]
    fn unknown_thread_is_terminal() {
        let ctx = resolve_session(99, &[], &[], &[]);
        assert!(ctx.session_id.is_none());
        assert!(ctx.transaction.is_none());
        assert!(ctx.session.is_none());
    }

    #[test]
    fn background_thread_without_session_is_terminal() {
        let threads = [mapping(5, None)];
        let sessions = [session(9)];
        let ctx = resolve_session(5, &threads, &[], &sessions);
        assert!(ctx.session_id.is_none());
        assert!(ctx.session.is_none());
    }

    #[test]
    fn partial_resolution_session_without_transaction() {
        let threads = [mapping(48, Some(9))];
        let sessions = [session(9)];
        let ctx = resolve_session(48, &threads, &[], &sessions);
        assert_eq!(ctx.session_id, Some(9));
        assert!(ctx.transaction.is_none());
        assert_eq!(ctx.session.unwrap().session_id, 9);
    }

    #[test]
    fn partial_resolution_transaction_without_session_row() {
        let threads = [mapping(48, Some(9))];
        let transactions = [transaction("T1", 9)];
        let ctx = resolve_session(48, &threads, &transactions, &[]);
        assert_eq!(ctx.session_id, Some(9));
        assert_eq!(ctx.transaction.unwrap().transaction_id, "T1");
        assert!(ctx.session.is_none());
    }
}
