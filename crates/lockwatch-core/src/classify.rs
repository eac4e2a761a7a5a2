//! Lock classification
//!
//! Maps one raw [`LockRecord`] to a semantic classification: what kind of
//! lock it is, what it actually covers, and how the operator view should
//! label it. Pure and total — every valid record classifies, nothing fails.
//!
//! Kind rules are token-based (a mode of "X,REC_NOT_GAP" is *not* a gap
//! lock even though the string contains "GAP"), while the mode label uses
//! substring containment with longer tokens tested first so "IX" never
//! reads as exclusive.

use serde::{Deserialize, Serialize};

use crate::model::{LockRecord, LockType};

/// Mode token marking a gap lock.
const GAP_TOKEN: &str = "GAP";
/// Mode token marking an insert-intention lock.
const INSERT_INTENTION_TOKEN: &str = "INSERT_INTENTION";
/// Clustered-index sentinel; not worth calling out in descriptions.
const PRIMARY_INDEX: &str = "PRIMARY";
/// Pseudo-record above the largest index entry.
const SUPREMUM: &str = "supremum pseudo-record";
/// Pseudo-record below the smallest index entry.
const INFIMUM: &str = "infimum pseudo-record";

/// Semantic kind of a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockKind {
    /// Whole-table lock.
    TableLock,
    /// Lock on the gap between index entries.
    GapLock,
    /// Gap-lock variant signaling intent to insert.
    InsertIntentionLock,
    /// Lock on an index record itself.
    RecordLock,
    /// Lock type the classifier doesn't model.
    Unknown,
}

impl LockKind {
    /// Display icon for the operator view. Cosmetic but deterministic.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::TableLock => "▦",
            Self::GapLock => "␣",
            Self::InsertIntentionLock => "⇥",
            Self::RecordLock => "▪",
            Self::Unknown => "?",
        }
    }

    /// Display color for the operator view. Cosmetic but deterministic.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::TableLock => "orange",
            Self::GapLock => "purple",
            Self::InsertIntentionLock => "teal",
            Self::RecordLock => "blue",
            Self::Unknown => "gray",
        }
    }
}

/// Human-meaningful description of one lock record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockClassification {
    /// Semantic kind.
    pub kind: LockKind,
    /// Short scope phrase, e.g. "row-level".
    pub scope_label: String,
    /// Full human description of what the lock covers.
    pub description: String,
    /// Icon keyed by kind.
    pub display_icon: String,
    /// Color keyed by kind.
    pub display_color: String,
    /// Human label for the lock mode, e.g. "intent-exclusive".
    pub mode_label: String,
}

/// Classify one lock record. Defined for every valid record.
#[must_use]
pub fn classify(lock: &LockRecord) -> LockClassification {
    let (kind, scope_label, description) = match &lock.lock_type {
        LockType::Table => (
            LockKind::TableLock,
            "table-level".to_string(),
            format!(
                "locks entire table {}.{}",
                lock.object_schema, lock.object_name
            ),
        ),
        LockType::Record => classify_record(lock),
        LockType::Other(other) => (
            LockKind::Unknown,
            String::new(),
            format!("unrecognized lock type {other}"),
        ),
    };

    LockClassification {
        kind,
        scope_label,
        description,
        display_icon: kind.icon().to_string(),
        display_color: kind.color().to_string(),
        mode_label: mode_label(&lock.lock_mode).to_string(),
    }
}

/// Record-level classification: gap beats insert-intention beats plain row.
fn classify_record(lock: &LockRecord) -> (LockKind, String, String) {
    let has_token = |t: &str| lock.mode_tokens().any(|tok| tok == t);

    let (kind, scope_label) = if has_token(GAP_TOKEN) {
        (LockKind::GapLock, "gap lock")
    } else if has_token(INSERT_INTENTION_TOKEN) {
        (LockKind::InsertIntentionLock, "insert-intention lock")
    } else {
        (LockKind::RecordLock, "row-level")
    };

    let mut description = format!("table {}.{}", lock.object_schema, lock.object_name);
    if let Some(index) = &lock.index_name {
        if index != PRIMARY_INDEX {
            description.push_str(&format!(" (index: {index})"));
        }
    }
    match lock.lock_data.as_deref() {
        Some(SUPREMUM) => description.push_str(", gap after the maximum value"),
        Some(INFIMUM) => description.push_str(", gap before the minimum value"),
        Some(data) => description.push_str(&format!(", key value: {data}")),
        None => {}
    }

    (kind, scope_label.to_string(), description)
}

/// Derive the human mode label by substring containment.
///
/// Longer tokens are tested first: "IX" contains "X" and "IS" contains "S",
/// so intent modes must win before their base modes are checked.
#[must_use]
pub fn mode_label(lock_mode: &str) -> &'static str {
    if lock_mode.contains("IX") {
        "intent-exclusive"
    } else if lock_mode.contains("IS") {
        "intent-shared"
    } else if lock_mode.contains('X') {
        "exclusive"
    } else if lock_mode.contains('S') {
        "shared"
    } else {
        "unknown"
    }
}
