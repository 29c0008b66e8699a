//! Unified data loading service for CLI and TUI
//!
//! Loads from the configured source, optionally validates, records API
//! fetches in the snapshot cache and falls back to the newest snapshot
//! when the API is unreachable.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::snapshot_cache::{SnapshotCacheService, SummarySnapshot};
use super::source::{SourceKind, SummarySource};
use super::validator::validate_summary;
use crate::types::{CacheWarning, DashboardSummary, OptiboardError, Result};

/// Result of one load
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub summary: Arc<DashboardSummary>,
    /// Origin of the summary actually returned
    pub source: String,
    /// True when the data came from the snapshot cache
    pub stale: bool,
    pub cache_warning: Option<CacheWarning>,
}

pub struct DataLoaderService {
    source: Box<dyn SummarySource>,
    cache: Option<SnapshotCacheService>,
    strict: bool,
}

impl DataLoaderService {
    pub fn new(source: Box<dyn SummarySource>, cache: Option<SnapshotCacheService>) -> Self {
        Self {
            source,
            cache,
            strict: false,
        }
    }

    /// Reject payloads that fail schema validation
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn load(&self) -> Result<LoadResult> {
        let kind = self.source.kind();

        match self.source.load() {
            Ok(summary) => {
                self.check(&summary)?;
                if kind == SourceKind::Api {
                    self.record(&summary);
                }
                debug!(source = self.source.name(), "loaded dashboard summary");
                Ok(LoadResult {
                    summary: Arc::new(summary),
                    source: self.source.name().to_string(),
                    stale: kind == SourceKind::Snapshot,
                    cache_warning: None,
                })
            }
            Err(err @ OptiboardError::Http(_)) if kind == SourceKind::Api => {
                warn!(error = %err, "dashboard API unavailable, trying snapshot cache");
                self.load_fallback(err)
            }
            Err(err) => Err(err),
        }
    }

    fn check(&self, summary: &DashboardSummary) -> Result<()> {
        if self.strict {
            validate_summary(summary)?;
        }
        Ok(())
    }

    /// Store an API fetch; failures only cost history, not the load
    fn record(&self, summary: &DashboardSummary) {
        let Some(cache) = &self.cache else {
            return;
        };
        let snapshot = SummarySnapshot {
            fetched_at: Utc::now(),
            source: self.source.name().to_string(),
            summary: summary.clone(),
        };
        if let Err(e) = cache.save(&snapshot) {
            warn!(error = %e, "failed to store snapshot");
        }
    }

    fn load_fallback(&self, original: OptiboardError) -> Result<LoadResult> {
        let Some(cache) = &self.cache else {
            return Err(original);
        };

        match cache.latest() {
            (Some(snapshot), warning) => {
                self.check(&snapshot.summary)?;
                Ok(LoadResult {
                    summary: Arc::new(snapshot.summary),
                    source: format!(
                        "{} (cached {})",
                        snapshot.source,
                        snapshot.fetched_at.format("%Y-%m-%d %H:%M UTC")
                    ),
                    stale: true,
                    cache_warning: warning,
                })
            }
            (None, Some(warning)) => {
                warn!(%warning, "snapshot fallback failed");
                Err(original)
            }
            (None, None) => Err(original),
        }
    }
}
