//! Prior statistics snapshots for trailing-period views.
//!
//! How snapshots get written is outside this crate; the server only reads
//! them back.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use statcache_core::{DerivedStats, StatsError};
use tracing::debug;

use crate::error::SnapshotError;

/// Supplies the all-time stats a player had at the start of the trailing window.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Returns the snapshot for a normalized player name, or `None` if the
    /// player has no snapshot yet.
    async fn prior_snapshot(&self, player: &str) -> Result<Option<DerivedStats>, SnapshotError>;
}

/// A source with no snapshots. Trailing-period stats are never produced.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSnapshots;

#[async_trait]
impl SnapshotSource for NoSnapshots {
    async fn prior_snapshot(&self, _player: &str) -> Result<Option<DerivedStats>, SnapshotError> {
        Ok(None)
    }
}

/// Reads snapshots from `<dir>/<player>.json`, each holding a serialized
/// `DerivedStats`.
#[derive(Debug, Clone)]
pub struct DirSnapshotSource {
    dir: PathBuf,
}

impl DirSnapshotSource {
    /// Creates a source reading from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the snapshot directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn snapshot_path(&self, player: &str) -> PathBuf {
        let file_name = format!("{}.json", urlencoding::encode(&player.to_lowercase()));
        self.dir.join(file_name)
    }
}

#[async_trait]
impl SnapshotSource for DirSnapshotSource {
    async fn prior_snapshot(&self, player: &str) -> Result<Option<DerivedStats>, SnapshotError> {
        let path = self.snapshot_path(player);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(player = %player, "No snapshot on disk");
                return Ok(None);
            },
            Err(e) => return Err(e.into()),
        };

        let stats = serde_json::from_slice(&bytes).map_err(|e| {
            StatsError::parse_error_with_cause(path.display().to_string(), "invalid snapshot", e)
        })?;

        Ok(Some(stats))
    }
}
