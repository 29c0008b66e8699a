//! Dashboard summary payload types
//!
//! Mirrors the JSON returned by the dashboard summary endpoint. Every
//! section is optional on the wire and defaults when absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Root payload of the dashboard summary endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DashboardSummary {
    #[serde(default)]
    pub cost_summary: CostSummary,
    #[serde(default)]
    pub optimization_stats: Option<OptimizationStats>,
    #[serde(default)]
    pub key_health: KeyHealth,
    #[serde(default)]
    pub usage_summary: UsageSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CostSummary {
    pub total_cost: f64,
    pub total_savings: f64,
    pub daily_average: f64,
    /// Change versus the previous window, in percent
    pub cost_change_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct KeyHealth {
    pub total_keys: u32,
    pub active_keys: u32,
    pub expiring_soon: u32,
    pub failing_keys: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct UsageSummary {
    pub total_requests: u64,
    pub total_tokens: u64,
    pub avg_latency_ms: f64,
}

/// Absent numeric fields read as NaN so the gap shows up in derived scores
fn missing_number() -> f64 {
    f64::NAN
}

/// `null` reads as NaN too; serde_json writes non-finite numbers as `null`
fn number_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Backend-computed optimization statistics for the selected window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizationStats {
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub savings_percentage: f64,
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub optimization_rate: f64,
    #[serde(default)]
    pub total_savings: f64,
    #[serde(default)]
    pub models_breakdown: Vec<ModelBreakdown>,
    #[serde(default)]
    pub strategies_used: Vec<StrategyUsage>,
    #[serde(default)]
    pub recommendations: Vec<OptimizationRecommendation>,
}

/// Per-model usage and performance within the window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelBreakdown {
    #[serde(default)]
    pub model_name: String,
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub usage_percentage: f64,
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub avg_cost: f64,
    /// Can be negative when the model costs more than the baseline
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub savings_percentage: f64,
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub success_rate: f64,
    #[serde(default)]
    pub total_requests: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyUsage {
    pub strategy_name: StrategyName,
    pub requests: u64,
    pub avg_savings: f64,
    pub avg_cost: f64,
}

/// Routing policy trading cost against quality
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StrategyName {
    CostFirst,
    Balanced,
    QualityFirst,
}

impl StrategyName {
    pub fn label(self) -> &'static str {
        match self {
            Self::CostFirst => "Cost first",
            Self::Balanced => "Balanced",
            Self::QualityFirst => "Quality first",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizationRecommendation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub priority: Priority,
    pub potential_savings: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    Strategy,
    Model,
    ApiKey,
    General,
}

impl RecommendationType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Strategy => "Strategy",
            Self::Model => "Model",
            Self::ApiKey => "API key",
            Self::General => "General",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_summary() {
        let summary: DashboardSummary = serde_json::from_str("{}").unwrap();
        assert!(summary.optimization_stats.is_none());
        assert_eq!(summary.key_health, KeyHealth::default());
    }

    #[test]
    fn test_deserialize_recommendation_type_field() {
        let json = r#"{
            "id": "rec-1",
            "type": "api_key",
            "priority": "high",
            "potential_savings": 12.5,
            "created_at": "2025-03-01T10:00:00Z"
        }"#;
        let rec: OptimizationRecommendation = serde_json::from_str(json).unwrap();
        assert_eq!(rec.kind, RecommendationType::ApiKey);
        assert_eq!(rec.priority, Priority::High);
        assert!(rec.title.is_empty());
    }

    #[test]
    fn test_strategy_name_snake_case() {
        let json = serde_json::to_string(&StrategyName::QualityFirst).unwrap();
        assert_eq!(json, "\"quality_first\"");
        let parsed: StrategyName = serde_json::from_str("\"cost_first\"").unwrap();
        assert_eq!(parsed, StrategyName::CostFirst);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let parsed: std::result::Result<StrategyName, _> = serde_json::from_str("\"fastest\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_optimization_stats_lists_default_empty() {
        let json = r#"{"savings_percentage": 12.0, "optimization_rate": 40.0}"#;
        let stats: OptimizationStats = serde_json::from_str(json).unwrap();
        assert!(stats.models_breakdown.is_empty());
        assert!(stats.strategies_used.is_empty());
        assert!(stats.recommendations.is_empty());
    }
}
