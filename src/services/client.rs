//! Dashboard API client
//!
//! Fetches the dashboard summary from the optimization backend. Blocking
//! reqwest, since callers already run on a background thread.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::debug;

use crate::types::{DashboardSummary, OptiboardError, Result};

/// Summary endpoint path, relative to the API base URL
const SUMMARY_PATH: &str = "/api/dashboard/summary";

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

pub struct DashboardClient {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl DashboardClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the summary endpoint for a window of `days`
    pub fn summary_url(&self, days: u32) -> String {
        format!("{}{}?days={}", self.base_url, SUMMARY_PATH, days)
    }

    /// Fetch the dashboard summary for the last `days` days
    pub fn fetch_summary(&self, days: u32) -> Result<DashboardSummary> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| OptiboardError::Http(format!("HTTP client error: {}", e)))?;

        let url = self.summary_url(days);
        debug!(%url, "fetching dashboard summary");

        let mut request = client.get(&url).header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request
            .send()
            .map_err(|e| OptiboardError::Http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OptiboardError::Http(format!(
                "{} returned status {}",
                url, status
            )));
        }

        let mut body = response
            .bytes()
            .map_err(|e| OptiboardError::Http(format!("Failed to read body: {}", e)))?
            .to_vec();

        parse_summary(&mut body)
    }
}

/// Parse a dashboard summary from raw JSON bytes (buffer is mutated by simd-json)
pub fn parse_summary(bytes: &mut [u8]) -> Result<DashboardSummary> {
    simd_json::from_slice(bytes).map_err(|e| OptiboardError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_url_trims_trailing_slash() {
        let client = DashboardClient::new("https://api.example.com/", None);
        assert_eq!(client.base_url(), "https://api.example.com");
        assert_eq!(
            client.summary_url(7),
            "https://api.example.com/api/dashboard/summary?days=7"
        );
    }

    #[test]
    fn test_summary_url_days() {
        let client = DashboardClient::new("http://localhost:8000", Some("tok".into()));
        assert!(client.summary_url(30).ends_with("?days=30"));
    }

    #[test]
    fn test_parse_summary_valid() {
        let mut body = br#"{
            "optimization_stats": {
                "savings_percentage": 31.5,
                "optimization_rate": 62.0,
                "models_breakdown": [{
                    "model_name": "gpt-4o-mini",
                    "usage_percentage": 100.0,
                    "avg_cost": 0.0004,
                    "savings_percentage": 31.5,
                    "success_rate": 98.2,
                    "total_requests": 1200
                }]
            }
        }"#
        .to_vec();

        let summary = parse_summary(&mut body).unwrap();
        let stats = summary.optimization_stats.unwrap();
        assert_eq!(stats.models_breakdown.len(), 1);
        assert_eq!(stats.models_breakdown[0].total_requests, 1200);
    }

    #[test]
    fn test_parse_summary_missing_fields_degrade_to_nan() {
        let mut body = br#"{"optimization_stats": {"models_breakdown": []}}"#.to_vec();
        let summary = parse_summary(&mut body).unwrap();
        let stats = summary.optimization_stats.as_ref().unwrap();
        assert!(stats.savings_percentage.is_nan());
        assert!(stats.optimization_rate.is_nan());

        let result = crate::services::compute_stats(Some(&summary));
        assert!(result.optimization_score.is_nan());
        assert!(result.performance_metrics.cost_reduction.is_nan());
    }

    #[test]
    fn test_parse_summary_partial_model_row() {
        let mut body = br#"{
            "optimization_stats": {
                "savings_percentage": 20.0,
                "optimization_rate": 50.0,
                "models_breakdown": [{"model_name": "gpt-4o", "total_requests": 10}]
            }
        }"#
        .to_vec();
        let summary = parse_summary(&mut body).unwrap();
        let model = &summary.optimization_stats.as_ref().unwrap().models_breakdown[0];
        assert_eq!(model.total_requests, 10);
        assert!(model.success_rate.is_nan());
        assert!(model.usage_percentage.is_nan());

        let err = crate::services::validate_summary(&summary).unwrap_err();
        assert!(matches!(err, OptiboardError::MalformedInput(_)));
    }

    #[test]
    fn test_parse_summary_invalid_json() {
        let mut body = b"not json {{{".to_vec();
        let err = parse_summary(&mut body).unwrap_err();
        assert!(matches!(err, OptiboardError::Parse(_)));
    }

    #[test]
    fn test_fetch_unreachable_host_is_http_error() {
        let client = DashboardClient::new("http://127.0.0.1:9", None)
            .with_timeout(Duration::from_millis(200));
        let err = client.fetch_summary(7).unwrap_err();
        assert!(matches!(err, OptiboardError::Http(_)));
    }
}
