//! Snapshot source contract
//!
//! The engine never performs I/O itself: a collaborator implements
//! [`SnapshotSource`] and hands the engine its batches as explicit
//! parameters. Sources are expected to degrade per-view — an unavailable
//! introspection view becomes an empty batch with a warning, and `Err` is
//! reserved for total failure such as a lost connection.
//!
//! [`fetch_with_backoff`] wraps a source with retry-with-backoff for
//! transient failures (no fixed sleeps in callers).

use tokio::time::{Duration, sleep};
use tracing::warn;

use crate::error::Result;
use crate::snapshot::SnapshotInput;

/// A collaborator that can produce one snapshot's input batches.
#[allow(async_fn_in_trait)]
pub trait SnapshotSource {
    /// Human-readable description of the source, for logs and errors.
    fn describe(&self) -> String;

    /// Fetch one best-effort temporally-consistent set of batches.
    ///
    /// Individually unavailable views must degrade to empty batches
    /// rather than failing the whole fetch.
    async fn fetch(&mut self) -> Result<SnapshotInput>;
}

/// Backoff configuration for retrying a failed source.
#[derive(Debug, Clone)]
pub struct Backoff {
    /// Initial delay before the second attempt.
    pub initial: Duration,
    /// Maximum delay between attempts.
    pub max: Duration,
    /// Multiplicative factor for backoff growth.
    pub factor: u32,
    /// Total attempt count (inclusive of the first).
    pub max_attempts: usize,
}

impl Backoff {
    /// Compute the next delay given the current delay.
    #[must_use]
    pub fn next_delay(&self, current: Duration) -> Duration {
        let next = current.saturating_mul(self.factor);
        if next > self.max { self.max } else { next }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(100),
            max: Duration::from_millis(2000),
            factor: 2,
            max_attempts: 3,
        }
    }
}

/// Fetch from a source, retrying transient failures with backoff.
///
/// Returns the last error once `max_attempts` is exhausted.
pub async fn fetch_with_backoff<S: SnapshotSource>(
    source: &mut S,
    backoff: &Backoff,
) -> Result<SnapshotInput> {
    let attempts = backoff.max_attempts.max(1);
    let mut delay = backoff.initial;
    let mut last_err = None;

    for attempt in 1..=attempts {
        match source.fetch().await {
            Ok(input) => return Ok(input),
            Err(err) => {
                warn!(
                    source = %source.describe(),
                    attempt,
                    max_attempts = attempts,
                    error = %err,
                    "snapshot fetch failed"
                );
                last_err = Some(err);
                if attempt < attempts {
                    sleep(delay).await;
                    delay = backoff.next_delay(delay);
                }
            }
        }
    }

    Err(last_err.unwrap_or_else(|| crate::Error::source("snapshot", "no attempts made")))
}
