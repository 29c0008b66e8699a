//! Snapshot cache for fetched dashboard summaries
//!
//! Every successful fetch is written to its own `snapshot_<millis>.json`
//! file, which gives an offline fallback and a history of scores over time.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::BaseDirs;
use fs2::FileExt;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::{CacheWarning, DashboardSummary, OptiboardError, Result};

const SNAPSHOT_PREFIX: &str = "snapshot_";
const SNAPSHOT_EXT: &str = "json";
const LOCK_FILE: &str = ".snapshots.lock";

/// A dashboard summary as it was fetched at a point in time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummarySnapshot {
    pub fetched_at: DateTime<Utc>,
    /// Where the summary came from (API URL or file path)
    pub source: String,
    pub summary: DashboardSummary,
}

pub struct SnapshotCacheService {
    cache_dir: PathBuf,
}

impl SnapshotCacheService {
    pub fn new() -> Result<Self> {
        Ok(Self::with_cache_dir(Self::default_cache_dir()?))
    }

    pub fn with_cache_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Default snapshot directory (~/.optiboard/snapshots)
    pub fn default_cache_dir() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| OptiboardError::Cache("Cannot determine home directory".into()))?;
        Ok(base_dirs.home_dir().join(".optiboard").join("snapshots"))
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn snapshot_path(&self, fetched_at: DateTime<Utc>) -> PathBuf {
        self.cache_dir.join(format!(
            "{}{}.{}",
            SNAPSHOT_PREFIX,
            fetched_at.timestamp_millis(),
            SNAPSHOT_EXT
        ))
    }

    /// Store a snapshot. Writers serialize on the directory lock file; the
    /// snapshot itself appears atomically via temp file + rename.
    pub fn save(&self, snapshot: &SummarySnapshot) -> Result<PathBuf> {
        fs::create_dir_all(&self.cache_dir)?;

        let content = serde_json::to_string_pretty(snapshot)
            .map_err(|e| OptiboardError::Cache(format!("Serialization failed: {}", e)))?;

        let path = self.snapshot_path(snapshot.fetched_at);
        let temp_path = path.with_extension("json.tmp");

        let lock = self.lock_dir()?;
        let written = Self::write_temp(&temp_path, &content).and_then(|()| {
            fs::rename(&temp_path, &path)
                .map_err(|e| OptiboardError::Cache(format!("Failed to rename temp file: {}", e)))
        });
        let _ = lock.unlock();

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        debug!(path = %path.display(), "saved snapshot");
        Ok(path)
    }

    fn write_temp(temp_path: &Path, content: &str) -> Result<()> {
        let mut file = File::create(temp_path)
            .map_err(|e| OptiboardError::Cache(format!("Failed to create temp file: {}", e)))?;
        file.write_all(content.as_bytes())
            .map_err(|e| OptiboardError::Cache(format!("Failed to write temp file: {}", e)))?;
        file.sync_all()
            .map_err(|e| OptiboardError::Cache(format!("Failed to sync temp file: {}", e)))
    }

    /// Exclusive lock on the snapshot directory, held by writers and pruning
    fn lock_dir(&self) -> Result<File> {
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.cache_dir.join(LOCK_FILE))?;
        lock.lock_exclusive()
            .map_err(|e| OptiboardError::Cache(format!("Failed to acquire write lock: {}", e)))?;
        Ok(lock)
    }

    /// Most recent snapshot, if any. A corrupt newest file is reported, not skipped.
    pub fn latest(&self) -> (Option<SummarySnapshot>, Option<CacheWarning>) {
        let Some(path) = self.collect_files().pop() else {
            return (None, None);
        };

        match Self::load_file(&path) {
            Ok(snapshot) => (Some(snapshot), None),
            Err(warning) => (None, Some(warning)),
        }
    }

    /// All readable snapshots, oldest first, plus a warning per unreadable file
    pub fn history(&self) -> (Vec<SummarySnapshot>, Vec<CacheWarning>) {
        let files = self.collect_files();

        let loaded: Vec<std::result::Result<SummarySnapshot, CacheWarning>> =
            files.par_iter().map(|f| Self::load_file(f)).collect();

        let mut snapshots = Vec::with_capacity(loaded.len());
        let mut warnings = Vec::new();
        for item in loaded {
            match item {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(warning) => {
                    warn!(%warning, "skipping unreadable snapshot");
                    warnings.push(warning);
                }
            }
        }

        snapshots.sort_by_key(|s| s.fetched_at);
        (snapshots, warnings)
    }

    /// Delete all but the newest `keep` snapshots. Returns how many were removed.
    pub fn prune(&self, keep: usize) -> Result<usize> {
        let files = self.collect_files();
        let excess = files.len().saturating_sub(keep);
        if excess == 0 {
            return Ok(0);
        }

        let lock = self.lock_dir()?;
        let removed = files[..excess].iter().try_for_each(fs::remove_file);
        let _ = lock.unlock();
        removed?;

        debug!(removed = excess, kept = files.len() - excess, "pruned snapshots");
        Ok(excess)
    }

    /// Remove every snapshot
    pub fn clear(&self) -> Result<usize> {
        self.prune(0)
    }

    /// Snapshot files sorted by the timestamp in their name, oldest first
    fn collect_files(&self) -> Vec<PathBuf> {
        let pattern = self
            .cache_dir
            .join(format!("{}*.{}", SNAPSHOT_PREFIX, SNAPSHOT_EXT));

        let mut files: Vec<(i64, PathBuf)> = glob::glob(&pattern.to_string_lossy())
            .map(|paths| {
                paths
                    .filter_map(|e| e.ok())
                    .filter_map(|p| snapshot_millis(&p).map(|ms| (ms, p)))
                    .collect()
            })
            .unwrap_or_default();

        files.sort_by_key(|(ms, _)| *ms);
        files.into_iter().map(|(_, p)| p).collect()
    }

    /// Read one snapshot. Files only appear complete, via rename.
    fn load_file(path: &Path) -> std::result::Result<SummarySnapshot, CacheWarning> {
        let file = File::open(path).map_err(|e| {
            CacheWarning::LoadFailed(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let mut content = String::new();
        std::io::BufReader::new(file)
            .read_to_string(&mut content)
            .map_err(|e| {
                CacheWarning::LoadFailed(format!("Failed to read {}: {}", path.display(), e))
            })?;

        serde_json::from_str(&content).map_err(|e| {
            CacheWarning::Corrupted(format!("Corrupted snapshot {}: {}", path.display(), e))
        })
    }
}

/// Millisecond timestamp encoded in a snapshot file name
fn snapshot_millis(path: &Path) -> Option<i64> {
    path.file_stem()?
        .to_str()?
        .strip_prefix(SNAPSHOT_PREFIX)?
        .parse()
        .ok()
}
