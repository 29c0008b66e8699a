//! Where dashboard summaries come from

use std::fs;
use std::path::PathBuf;

use super::client::{parse_summary, DashboardClient};
use super::snapshot_cache::SnapshotCacheService;
use crate::types::{DashboardSummary, OptiboardError, Result};

/// Origin category of a summary source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Api,
    Snapshot,
}

/// Trait for loading a dashboard summary from one origin
pub trait SummarySource: Send + Sync {
    /// Human-readable origin (URL, file path, "snapshot cache")
    fn name(&self) -> &str;

    fn kind(&self) -> SourceKind;

    /// Load the current summary
    fn load(&self) -> Result<DashboardSummary>;
}

/// Summary stored in a local JSON file
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl SummarySource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    fn load(&self) -> Result<DashboardSummary> {
        let mut content = fs::read(&self.path)?;
        parse_summary(&mut content)
    }
}

/// Summary fetched from the dashboard API
pub struct ApiSource {
    client: DashboardClient,
    days: u32,
}

impl ApiSource {
    pub fn new(client: DashboardClient, days: u32) -> Self {
        Self { client, days }
    }
}

impl SummarySource for ApiSource {
    fn name(&self) -> &str {
        self.client.base_url()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Api
    }

    fn load(&self) -> Result<DashboardSummary> {
        self.client.fetch_summary(self.days)
    }
}

/// Most recent summary from the snapshot cache
pub struct SnapshotSource {
    cache: SnapshotCacheService,
}

impl SnapshotSource {
    pub fn new(cache: SnapshotCacheService) -> Self {
        Self { cache }
    }
}

impl SummarySource for SnapshotSource {
    fn name(&self) -> &str {
        "snapshot cache"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Snapshot
    }

    fn load(&self) -> Result<DashboardSummary> {
        match self.cache.latest() {
            (Some(snapshot), _) => Ok(snapshot.summary),
            (None, Some(warning)) => Err(OptiboardError::Cache(warning.to_string())),
            (None, None) => Err(OptiboardError::Cache(format!(
                "No snapshots in {}",
                self.cache.cache_dir().display()
            ))),
        }
    }
}
