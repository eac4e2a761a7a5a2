//! File-backed snapshot source
//!
//! Reads a captured snapshot dump (the JSON form of `SnapshotInput`) from
//! disk. Used by the CLI and by tests; a live database executor sits
//! behind the same `SnapshotSource` trait in the enclosing service.

use std::path::PathBuf;

use lockwatch_core::snapshot::SnapshotInput;
use lockwatch_core::source::SnapshotSource;
use lockwatch_core::{Error, Result};

/// Snapshot source backed by a JSON dump file.
pub struct JsonSnapshotSource {
    path: PathBuf,
}

impl JsonSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for JsonSnapshotSource {
    fn describe(&self) -> String {
        format!("json dump {}", self.path.display())
    }

    async fn fetch(&mut self) -> Result<SnapshotInput> {
        let text = std::fs::read_to_string(&self.path).map_err(|err| {
            Error::source(
                "snapshot_dump",
                format!("{}: {err}", self.path.display()),
            )
        })?;
        let input = serde_json::from_str(&text)
            .map_err(|err| Error::source("snapshot_dump", err.to_string()))?;
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_a_minimal_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::write(&path, r#"{"locks": []}"#).unwrap();
        let mut source = JsonSnapshotSource::new(&path);
        let input = source.fetch().await.unwrap();
        assert!(input.locks.is_empty());
        assert!(input.wait_edges.is_none());
    }

    #[tokio::test]
    async fn missing_file_is_a_source_error() {
        let mut source = JsonSnapshotSource::new("/nonexistent/dump.json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, Error::Source { .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_a_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::write(&path, "{not json").unwrap();
        let mut source = JsonSnapshotSource::new(&path);
        assert!(source.fetch().await.is_err());
    }
}
