//! Plain-text rendering for the operator view
//!
//! Fixed-width tables on stdout, no ANSI. JSON output is handled at the
//! command layer with serde.

use std::fmt::Write;

use lockwatch_core::model::LockStatus;
use lockwatch_core::snapshot::Snapshot;
use lockwatch_core::wait_graph::{blocked_count, root_blockers};

/// Truncate to `max` characters with an ellipsis marker.
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

fn status_tag(status: LockStatus) -> &'static str {
    match status {
        LockStatus::Granted => "GRANTED",
        LockStatus::Waiting => "WAITING",
    }
}

/// Render the enriched lock table.
pub fn render_locks(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    if let Some(ts) = snapshot.captured_at {
        let _ = writeln!(out, "snapshot captured at {}", ts.to_rfc3339());
    }
    if snapshot.locks.is_empty() {
        let _ = writeln!(out, "no locks in snapshot");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<8} {:<10} {:<8} {:<18} {:<10} {:>5} {:<40}",
        "STATUS", "TXN", "SESSION", "MODE", "USER", "SECS", "DESCRIPTION"
    );
    for lock in &snapshot.locks {
        let _ = writeln!(
            out,
            "{:<8} {:<10} {:<8} {:<18} {:<10} {:>5} {:<40}",
            status_tag(lock.lock.lock_status),
            clip(lock.lock.transaction_id.as_deref().unwrap_or("-"), 10),
            lock.session_id
                .map_or_else(|| "-".to_string(), |id| id.to_string()),
            lock.classification.mode_label,
            clip(lock.user.as_deref().unwrap_or("-"), 10),
            lock.lock_duration_seconds,
            clip(&lock.classification.description, 60),
        );
        if let Some(stmt) = &lock.statement {
            let _ = writeln!(out, "         sql: {}", clip(&stmt.sql_text, 90));
        }
    }
    out
}

/// Render wait edges and the heads of blocking chains.
pub fn render_waits(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    if snapshot.wait_edges.is_empty() {
        let _ = writeln!(out, "no blocking detected");
        return out;
    }

    for edge in &snapshot.wait_edges {
        let _ = writeln!(
            out,
            "{} (thread {}) waits on {} (thread {})  [{}]",
            edge.waiting_transaction_id.as_deref().unwrap_or("?"),
            edge.waiting_thread_id,
            edge.blocking_transaction_id.as_deref().unwrap_or("?"),
            edge.blocking_thread_id,
            edge.waiting_lock_key,
        );
    }

    let _ = writeln!(
        out,
        "blocked transactions: {}",
        blocked_count(&snapshot.wait_edges)
    );
    let roots = root_blockers(&snapshot.wait_edges);
    if !roots.is_empty() {
        let _ = writeln!(out, "root blockers: {}", roots.join(", "));
    }
    out
}

/// Render the session/transaction overview.
pub fn render_sessions(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    if snapshot.sessions.is_empty() && snapshot.transactions.is_empty() {
        let _ = writeln!(out, "no sessions in snapshot");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<8} {:<12} {:<22} {:<10} {:>5} {:<30}",
        "SESSION", "USER", "HOST", "COMMAND", "SECS", "STATEMENT"
    );
    for session in &snapshot.sessions {
        let _ = writeln!(
            out,
            "{:<8} {:<12} {:<22} {:<10} {:>5} {:<30}",
            session.session_id,
            clip(&session.user, 12),
            clip(&session.host, 22),
            clip(&session.command, 10),
            session.elapsed_seconds,
            clip(session.info.as_deref().unwrap_or("-"), 50),
        );
    }
    for tx in &snapshot.transactions {
        let _ = writeln!(
            out,
            "txn {:<8} session {:<6} state {:<12} {:>5}s",
            clip(&tx.transaction_id, 8),
            tx.session_id,
            clip(&tx.state, 12),
            tx.duration_seconds,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use lockwatch_core::model::{LockRecord, LockType};
    use lockwatch_core::snapshot::{SnapshotInput, correlate};

    use super::*;

    fn snapshot_with_pair() -> Snapshot {
        let lock = |tx: &str, status| LockRecord {
            engine: "INNODB".to_string(),
            transaction_id: Some(tx.to_string()),
            thread_id: 1,
            object_schema: "db1".to_string(),
            object_name: "orders".to_string(),
            index_name: None,
            lock_type: LockType::Record,
            lock_mode: "X".to_string(),
            lock_status: status,
            lock_data: Some("100".to_string()),
        };
        correlate(&SnapshotInput {
            locks: vec![
                lock("T2", LockStatus::Waiting),
                lock("T1", LockStatus::Granted),
            ],
            ..SnapshotInput::default()
        })
    }

    #[test]
    fn lock_table_has_header_and_rows() {
        let text = render_locks(&snapshot_with_pair());
        assert!(text.contains("STATUS"));
        assert!(text.contains("WAITING"));
        assert!(text.contains("GRANTED"));
        assert!(text.contains("exclusive"));
    }

    #[test]
    fn empty_snapshot_renders_placeholder() {
        let empty = correlate(&SnapshotInput::default());
        assert!(render_locks(&empty).contains("no locks"));
        assert!(render_waits(&empty).contains("no blocking"));
        assert!(render_sessions(&empty).contains("no sessions"));
    }

    #[test]
    fn waits_name_both_sides_and_roots() {
        let text = render_waits(&snapshot_with_pair());
        assert!(text.contains("T2"));
        assert!(text.contains("waits on T1"));
        assert!(text.contains("blocked transactions: 1"));
        assert!(text.contains("root blockers: T1"));
    }

    #[test]
    fn no_ansi_escapes_in_output() {
        let text = render_locks(&snapshot_with_pair());
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn clip_preserves_short_strings() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("a-much-longer-string", 10), "a-much-...");
    }
}
