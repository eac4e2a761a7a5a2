//! lockwatch-core: Core library for Lockwatch
//!
//! This crate provides the lock-state correlation engine behind `lw`: it
//! takes raw, heterogeneous introspection batches from a live database
//! (lock rows, thread-to-session mappings, transactions, statement
//! events) and fuses them into a classified, operator-facing view of who
//! holds which locks, who is blocked on whom, and what SQL produced each
//! lock.
//!
//! # Architecture
//!
//! ```text
//! SnapshotSource → SnapshotInput batches
//!                        ↓
//!      classify ─┬─ resolve ─┬─ statement
//!                └── enrich ─┘
//!                        ↓
//!        wait_graph → Snapshot (EnrichedLock[], WaitEdge[])
//! ```
//!
//! # Modules
//!
//! - `model`: raw snapshot records as delivered by the source
//! - `classify`: per-lock semantic classification
//! - `resolve`: thread → session/transaction resolution
//! - `statement`: layered SQL statement location
//! - `enrich`: per-lock enrichment (the unit returned to callers)
//! - `wait_graph`: wait-for edges with lock co-location fallback
//! - `snapshot`: snapshot assembly, the engine's single entry point
//! - `source`: collaborator contract and retry-with-backoff
//! - `registry`: per-session source registry with idle eviction
//! - `config`: lockwatch.toml configuration
//! - `logging`: tracing-based structured logging setup
//!
//! The engine is synchronous and stateless: given fixed input batches it
//! performs pure in-memory joins, so concurrent invocations are safe as
//! long as each receives its own batches.
//!
//! # Safety
//!
//! This crate forbids unsafe code.

#![forbid(unsafe_code)]

pub mod classify;
pub mod config;
pub mod enrich;
pub mod error;
pub mod logging;
pub mod model;
pub mod registry;
pub mod resolve;
pub mod snapshot;
pub mod source;
pub mod statement;
pub mod wait_graph;

pub use classify::{LockClassification, LockKind, classify};
pub use enrich::EnrichedLock;
pub use error::{Error, Result};
pub use model::{
    LockRecord, LockStatus, LockType, SessionRecord, StatementRecord, ThreadMapping,
    TransactionRecord,
};
pub use snapshot::{Snapshot, SnapshotInput, correlate};
pub use source::SnapshotSource;
pub use wait_graph::{WaitEdge, blocked_count, build_wait_edges, root_blockers};
