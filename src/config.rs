//! Runtime settings resolved from CLI flags and environment

use std::path::PathBuf;
use std::time::Duration;

use crate::services::{
    ApiSource, DashboardClient, DataLoaderService, EmptyModelPolicy, FileSource,
    OptimizationAggregator, SnapshotCacheService, SnapshotSource, SummarySource,
};
use crate::types::{OptiboardError, Result};

pub const DEFAULT_DAYS: u32 = 7;
pub const MAX_DAYS: u32 = 365;
pub const DEFAULT_REFRESH_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: Option<String>,
    pub token: Option<String>,
    /// Summary window in days
    pub days: u32,
    pub file: Option<PathBuf>,
    pub offline: bool,
    pub strict: bool,
    pub empty_models: EmptyModelPolicy,
    pub cache_dir: PathBuf,
    /// TUI auto-refresh period; zero disables it
    pub refresh_interval: Duration,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_DAYS).contains(&self.days) {
            return Err(OptiboardError::Config(format!(
                "--days must be between 1 and {}, got {}",
                MAX_DAYS, self.days
            )));
        }
        if self.file.is_none() && !self.offline && self.api_url.is_none() {
            return Err(OptiboardError::Config(
                "Provide --api-url (or OPTIBOARD_API_URL), --file, or --offline".into(),
            ));
        }
        Ok(())
    }

    pub fn snapshot_cache(&self) -> SnapshotCacheService {
        SnapshotCacheService::with_cache_dir(self.cache_dir.clone())
    }

    pub fn aggregator(&self) -> OptimizationAggregator {
        OptimizationAggregator::new(self.empty_models)
    }

    /// Pick the summary source: file, then offline snapshot, then API
    pub fn source(&self) -> Result<Box<dyn SummarySource>> {
        self.validate()?;

        if let Some(path) = &self.file {
            return Ok(Box::new(FileSource::new(path.clone())));
        }
        if self.offline {
            return Ok(Box::new(SnapshotSource::new(self.snapshot_cache())));
        }
        let url = self
            .api_url
            .as_deref()
            .ok_or_else(|| OptiboardError::Config("Missing API URL".into()))?;
        let client = DashboardClient::new(url, self.token.clone());
        Ok(Box::new(ApiSource::new(client, self.days)))
    }

    pub fn data_loader(&self) -> Result<DataLoaderService> {
        Ok(DataLoaderService::new(self.source()?, Some(self.snapshot_cache()))
            .with_strict(self.strict))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SourceKind;

    fn make_settings() -> Settings {
        Settings {
            api_url: None,
            token: None,
            days: DEFAULT_DAYS,
            file: None,
            offline: false,
            strict: false,
            empty_models: EmptyModelPolicy::Propagate,
            cache_dir: PathBuf::from("/tmp/optiboard-test"),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
        }
    }

    #[test]
    fn test_no_source_is_config_error() {
        let settings = make_settings();
        assert!(matches!(settings.source(), Err(OptiboardError::Config(_))));
    }

    #[test]
    fn test_days_out_of_range() {
        let mut settings = make_settings();
        settings.api_url = Some("http://localhost".into());
        settings.days = 0;
        assert!(settings.validate().is_err());
        settings.days = 366;
        assert!(settings.validate().is_err());
        settings.days = 365;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_file_takes_precedence() {
        let mut settings = make_settings();
        settings.api_url = Some("http://localhost".into());
        settings.offline = true;
        settings.file = Some(PathBuf::from("summary.json"));
        assert_eq!(settings.source().unwrap().kind(), SourceKind::File);
    }

    #[test]
    fn test_offline_before_api() {
        let mut settings = make_settings();
        settings.api_url = Some("http://localhost".into());
        settings.offline = true;
        assert_eq!(settings.source().unwrap().kind(), SourceKind::Snapshot);
    }

    #[test]
    fn test_api_source() {
        let mut settings = make_settings();
        settings.api_url = Some("http://localhost:8000".into());
        let source = settings.source().unwrap();
        assert_eq!(source.kind(), SourceKind::Api);
        assert_eq!(source.name(), "http://localhost:8000");
    }

    #[test]
    fn test_aggregator_uses_policy() {
        let mut settings = make_settings();
        settings.empty_models = EmptyModelPolicy::Zero;
        assert_eq!(settings.aggregator().empty_models(), EmptyModelPolicy::Zero);
    }
}
