//! Source registry with idle eviction
//!
//! Per-session collaborator state (a live connection pool, a file handle)
//! is kept behind an explicit registry keyed by an opaque handle, never as
//! ambient globals. The enclosing service creates an entry per client
//! session, looks it up per request, and periodically evicts entries that
//! have gone idle. The engine itself never touches the registry: batches
//! reach it as explicit parameters.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use tracing::debug;

/// Opaque handle identifying one registered source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(u64);

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

struct Entry<S> {
    source: S,
    last_used: Instant,
}

/// Registry of per-session snapshot sources with timeout-based eviction.
pub struct SourceRegistry<S> {
    entries: HashMap<u64, Entry<S>>,
    next_id: u64,
}

impl<S> SourceRegistry<S> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_id: 1,
        }
    }

    /// Register a source and return its handle.
    pub fn create(&mut self, source: S) -> SessionHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(
            id,
            Entry {
                source,
                last_used: Instant::now(),
            },
        );
        debug!(handle = id, "registered snapshot source");
        SessionHandle(id)
    }

    /// Look up a source, refreshing its idle clock.
    pub fn get(&mut self, handle: SessionHandle) -> Option<&mut S> {
        let entry = self.entries.get_mut(&handle.0)?;
        entry.last_used = Instant::now();
        Some(&mut entry.source)
    }

    /// Remove a source explicitly, returning it if present.
    pub fn remove(&mut self, handle: SessionHandle) -> Option<S> {
        self.entries.remove(&handle.0).map(|e| e.source)
    }

    /// Evict every entry idle longer than `max_idle`; returns how many
    /// were dropped.
    pub fn evict_idle(&mut self, max_idle: Duration) -> usize {
        self.evict_idle_at(Instant::now(), max_idle)
    }

    fn evict_idle_at(&mut self, now: Instant, max_idle: Duration) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.last_used) <= max_idle);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = self.entries.len(), "evicted idle sources");
        }
        evicted
    }

    /// Number of registered sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S> Default for SourceRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
