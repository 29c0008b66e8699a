//! Derived optimization statistics

use serde::Serialize;
use std::collections::BTreeMap;

use super::{ModelBreakdown, RecommendationType, StrategyUsage};

/// Statistics derived from a dashboard summary.
///
/// `Default` is the all-zero result returned when the summary carries no
/// optimization stats. Score fields may be NaN or infinite for degenerate
/// inputs; JSON output renders those as `null`.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct OptimizationStatsResult {
    pub top_performing_model: Option<ModelBreakdown>,
    pub most_efficient_strategy: Option<StrategyUsage>,
    pub optimization_score: f64,
    pub model_diversity_score: f64,
    pub recommendations_summary: RecommendationsSummary,
    pub performance_metrics: PerformanceMetrics,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct RecommendationsSummary {
    pub total: usize,
    pub high_priority: usize,
    pub potential_savings: f64,
    pub categories: BTreeMap<RecommendationType, usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct PerformanceMetrics {
    pub total_requests: u64,
    pub avg_success_rate: f64,
    pub optimized_requests: u64,
    /// Same value as the summary's savings percentage
    pub cost_reduction: f64,
}
