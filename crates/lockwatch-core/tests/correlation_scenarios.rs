//! End-to-end correlation scenarios
//!
//! Exercises the whole pipeline through `correlate`: realistic contended
//! snapshots, degraded sources, and determinism guarantees.

use chrono::{DateTime, Utc};
use lockwatch_core::classify::LockKind;
use lockwatch_core::model::{
    LockRecord, LockStatus, LockType, SessionRecord, StatementRecord, ThreadMapping,
    TransactionRecord,
};
use lockwatch_core::snapshot::{SnapshotInput, correlate};
use lockwatch_core::statement::StatementOrigin;
use lockwatch_core::wait_graph::root_blockers;

fn ts(text: &str) -> Option<DateTime<Utc>> {
    text.parse().ok()
}

fn record_lock(
    tx: &str,
    thread_id: u64,
    status: LockStatus,
    data: &str,
) -> LockRecord {
    LockRecord {
        engine: "INNODB".to_string(),
        transaction_id: Some(tx.to_string()),
        thread_id,
        object_schema: "db1".to_string(),
        object_name: "orders".to_string(),
        index_name: Some("PRIMARY".to_string()),
        lock_type: LockType::Record,
        lock_mode: "X,REC_NOT_GAP".to_string(),
        lock_status: status,
        lock_data: Some(data.to_string()),
    }
}

/// Two transactions contending on db1.orders key 100: T1 holds, T2 waits.
fn contended_snapshot() -> SnapshotInput {
    SnapshotInput {
        captured_at: ts("2026-08-20T12:00:00Z"),
        locks: vec![
            record_lock("T2", 52, LockStatus::Waiting, "100"),
            record_lock("T1", 48, LockStatus::Granted, "100"),
        ],
        threads: vec![
            ThreadMapping {
                thread_id: 48,
                session_id: Some(9),
                name: "thread/sql/one_connection".to_string(),
            },
            ThreadMapping {
                thread_id: 52,
                session_id: Some(11),
                name: "thread/sql/one_connection".to_string(),
            },
        ],
        transactions: vec![
            TransactionRecord {
                transaction_id: "T1".to_string(),
                session_id: 9,
                started_at: ts("2026-08-20T11:59:20Z"),
                duration_seconds: 40,
                state: "RUNNING".to_string(),
                wait_started_at: None,
            },
            TransactionRecord {
                transaction_id: "T2".to_string(),
                session_id: 11,
                started_at: ts("2026-08-20T11:59:50Z"),
                duration_seconds: 10,
                state: "LOCK WAIT".to_string(),
                wait_started_at: ts("2026-08-20T11:59:55Z"),
            },
        ],
        sessions: vec![
            SessionRecord {
                session_id: 9,
                user: "app".to_string(),
                host: "10.0.0.5:52011".to_string(),
                db: Some("db1".to_string()),
                command: "Sleep".to_string(),
                elapsed_seconds: 35,
                state: None,
                info: None,
            },
            SessionRecord {
                session_id: 11,
                user: "app".to_string(),
                host: "10.0.0.6:40122".to_string(),
                db: Some("db1".to_string()),
                command: "Query".to_string(),
                elapsed_seconds: 10,
                state: Some("updating".to_string()),
                info: Some("UPDATE orders SET qty = 2 WHERE id = 100".to_string()),
            },
        ],
        statements_current: vec![StatementRecord {
            thread_id: 52,
            event_id: 31,
            start_time: ts("2026-08-20T11:59:55Z"),
            end_time: None,
            sql_text: "UPDATE orders SET qty = 2 WHERE id = 100".to_string(),
            digest_text: Some("UPDATE `orders` SET `qty` = ? WHERE `id` = ?".to_string()),
            schema: Some("db1".to_string()),
        }],
        statements_history: vec![StatementRecord {
            thread_id: 48,
            event_id: 27,
            start_time: ts("2026-08-20T11:59:20Z"),
            end_time: ts("2026-08-20T11:59:21Z"),
            sql_text: "UPDATE orders SET qty = 1 WHERE id = 100".to_string(),
            digest_text: None,
            schema: Some("db1".to_string()),
        }],
        wait_edges: None,
    }
}

#[test]
fn contended_snapshot_end_to_end() {
    let snapshot = correlate(&contended_snapshot());

    // Both locks classified as exclusive row locks.
    assert_eq!(snapshot.locks.len(), 2);
    for lock in &snapshot.locks {
        assert_eq!(lock.classification.kind, LockKind::RecordLock);
        assert_eq!(lock.classification.mode_label, "exclusive");
    }

    // Fallback wait graph finds exactly the T2 → T1 edge.
    assert_eq!(snapshot.wait_edges.len(), 1);
    let edge = &snapshot.wait_edges[0];
    assert_eq!(edge.waiting_transaction_id.as_deref(), Some("T2"));
    assert_eq!(edge.blocking_transaction_id.as_deref(), Some("T1"));
    assert_eq!(root_blockers(&snapshot.wait_edges), vec!["T1".to_string()]);
}

#[test]
fn statements_attributed_per_tier() {
    let snapshot = correlate(&contended_snapshot());

    // T2's thread has a current statement.
    let waiting = &snapshot.locks[0];
    let stmt = waiting.statement.as_ref().unwrap();
    assert_eq!(stmt.origin, StatementOrigin::Current);
    assert!(stmt.sql_text.starts_with("UPDATE orders SET qty = 2"));

    // T1's thread only has history.
    let holding = &snapshot.locks[1];
    let stmt = holding.statement.as_ref().unwrap();
    assert_eq!(stmt.origin, StatementOrigin::History);
    assert!(stmt.sql_text.starts_with("UPDATE orders SET qty = 1"));
}

#[test]
fn durations_come_from_transactions() {
    let snapshot = correlate(&contended_snapshot());
    assert_eq!(snapshot.locks[0].lock_duration_seconds, 10);
    assert_eq!(snapshot.locks[1].lock_duration_seconds, 40);
}

#[test]
fn direct_wait_rows_preempt_the_fallback() {
    let mut input = contended_snapshot();
    let direct = lockwatch_core::WaitEdge {
        waiting_transaction_id: Some("T2".to_string()),
        waiting_thread_id: 52,
        waiting_event_id: Some(31),
        waiting_lock_key: "db1.orders:PRIMARY:100".to_string(),
        blocking_transaction_id: Some("T1".to_string()),
        blocking_thread_id: 48,
        blocking_event_id: Some(27),
        blocking_lock_key: "db1.orders:PRIMARY:100".to_string(),
    };
    input.wait_edges = Some(vec![direct.clone()]);
    let snapshot = correlate(&input);
    assert_eq!(snapshot.wait_edges, vec![direct]);
}

#[test]
fn locks_only_snapshot_degrades_gracefully() {
    let input = SnapshotInput {
        captured_at: ts("2026-08-20T12:00:00Z"),
        locks: vec![
            record_lock("T2", 52, LockStatus::Waiting, "100"),
            record_lock("T1", 48, LockStatus::Granted, "100"),
        ],
        ..SnapshotInput::default()
    };
    let snapshot = correlate(&input);

    // Enrichment is total: no sessions, transactions, or statements, yet
    // every lock is present with optional fields unset.
    assert_eq!(snapshot.locks.len(), 2);
    for lock in &snapshot.locks {
        assert!(lock.session_id.is_none());
        assert!(lock.statement.is_none());
        assert_eq!(lock.lock_duration_seconds, 0);
    }

    // The wait graph still works from the lock batch alone.
    assert_eq!(snapshot.wait_edges.len(), 1);
}

#[test]
fn correlate_twice_is_byte_identical() {
    let input = contended_snapshot();
    let a = serde_json::to_vec(&correlate(&input)).unwrap();
    let b = serde_json::to_vec(&correlate(&input)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn snapshot_serializes_for_transport() {
    let snapshot = correlate(&contended_snapshot());
    let json = serde_json::to_value(&snapshot).unwrap();
    assert!(json["locks"].is_array());
    assert!(json["wait_edges"].is_array());
    assert_eq!(json["locks"][0]["lock_status"], "WAITING");
    assert_eq!(json["locks"][0]["classification"]["kind"], "RECORD_LOCK");
}
