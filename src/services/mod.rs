//! Services for loading summaries and deriving statistics

pub mod client;
pub mod data_loader;
pub mod insights;
pub mod memo;
pub mod optimization;
pub mod snapshot_cache;
pub mod source;
pub mod validator;

pub use client::DashboardClient;
pub use data_loader::{DataLoaderService, LoadResult};
pub use insights::{compute_insights, insights, Insight, InsightKind, InsightLevel};
pub use memo::StatsMemo;
pub use optimization::{compute_stats, EmptyModelPolicy, OptimizationAggregator};
pub use snapshot_cache::{SnapshotCacheService, SummarySnapshot};
pub use source::{ApiSource, FileSource, SnapshotSource, SourceKind, SummarySource};
pub use validator::validate_summary;
