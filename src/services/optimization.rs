//! Optimization statistics aggregator
//!
//! Derives scores, rankings and recommendation counts from a dashboard
//! summary. Every reduction is a left fold starting at `0.0`, so results
//! match the backend dashboard's own arithmetic bit for bit.

use std::collections::BTreeMap;

use crate::types::{
    DashboardSummary, ModelBreakdown, OptimizationRecommendation, OptimizationStats,
    OptimizationStatsResult, PerformanceMetrics, Priority, RecommendationsSummary, StrategyUsage,
};

/// Weights of the per-model performance score
const MODEL_SAVINGS_WEIGHT: f64 = 0.6;
const MODEL_SUCCESS_WEIGHT: f64 = 0.4;

/// Weights of the overall optimization score
const SCORE_SAVINGS_WEIGHT: f64 = 0.4;
const SCORE_RATE_WEIGHT: f64 = 0.3;
const SCORE_SUCCESS_WEIGHT: f64 = 0.3;
const MAX_OPTIMIZATION_SCORE: f64 = 100.0;

/// Diversity penalty per unit of relative usage variance
const DIVERSITY_PENALTY: f64 = 10.0;
const MAX_DIVERSITY_SCORE: f64 = 100.0;

/// How the optimization and diversity scores treat an empty (or all-zero)
/// model breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyModelPolicy {
    /// Let NaN and infinities flow through, as the web dashboard does
    #[default]
    Propagate,
    /// Treat the missing mean success rate as 0 and report zero diversity
    Zero,
}

/// Aggregator for deriving optimization statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimizationAggregator {
    empty_models: EmptyModelPolicy,
}

impl OptimizationAggregator {
    pub fn new(empty_models: EmptyModelPolicy) -> Self {
        Self { empty_models }
    }

    pub fn empty_models(&self) -> EmptyModelPolicy {
        self.empty_models
    }

    /// Derive statistics from a summary.
    ///
    /// A missing summary, or one without `optimization_stats`, yields the
    /// all-zero result.
    pub fn compute(&self, data: Option<&DashboardSummary>) -> OptimizationStatsResult {
        let Some(stats) = data.and_then(|d| d.optimization_stats.as_ref()) else {
            return OptimizationStatsResult::default();
        };

        OptimizationStatsResult {
            top_performing_model: top_performing_model(&stats.models_breakdown).cloned(),
            most_efficient_strategy: most_efficient_strategy(&stats.strategies_used).cloned(),
            optimization_score: self.optimization_score(stats),
            model_diversity_score: self.model_diversity_score(&stats.models_breakdown),
            recommendations_summary: summarize_recommendations(&stats.recommendations),
            performance_metrics: performance_metrics(stats),
        }
    }

    fn optimization_score(&self, stats: &OptimizationStats) -> f64 {
        let mean_success = if stats.models_breakdown.is_empty()
            && self.empty_models == EmptyModelPolicy::Zero
        {
            0.0
        } else {
            sum_by(&stats.models_breakdown, |m| m.success_rate)
                / stats.models_breakdown.len() as f64
        };

        let raw = SCORE_SAVINGS_WEIGHT * stats.savings_percentage
            + SCORE_RATE_WEIGHT * stats.optimization_rate
            + SCORE_SUCCESS_WEIGHT * mean_success;

        nan_min(raw, MAX_OPTIMIZATION_SCORE)
    }

    fn model_diversity_score(&self, models: &[ModelBreakdown]) -> f64 {
        let count = models.len() as f64;
        let total_usage = sum_by(models, |m| m.usage_percentage);
        let ideal_usage = total_usage / count;

        if self.empty_models == EmptyModelPolicy::Zero && (models.is_empty() || ideal_usage == 0.0)
        {
            return 0.0;
        }

        let variance = sum_by(models, |m| {
            let deviation = m.usage_percentage - ideal_usage;
            deviation * deviation
        }) / count;

        nan_max(
            0.0,
            MAX_DIVERSITY_SCORE - variance / ideal_usage * DIVERSITY_PENALTY,
        )
    }
}

/// Derive statistics with the default (propagating) policy
pub fn compute_stats(data: Option<&DashboardSummary>) -> OptimizationStatsResult {
    OptimizationAggregator::default().compute(data)
}

/// Per-model performance score: savings weighted over success rate
pub fn performance_score(model: &ModelBreakdown) -> f64 {
    MODEL_SAVINGS_WEIGHT * model.savings_percentage + MODEL_SUCCESS_WEIGHT * model.success_rate
}

/// Highest-scoring model. Earlier entries win ties.
pub fn top_performing_model(models: &[ModelBreakdown]) -> Option<&ModelBreakdown> {
    let (first, rest) = models.split_first()?;
    Some(rest.iter().fold(first, |best, current| {
        if performance_score(current) > performance_score(best) {
            current
        } else {
            best
        }
    }))
}

/// Strategy with the highest average savings. Earlier entries win ties.
pub fn most_efficient_strategy(strategies: &[StrategyUsage]) -> Option<&StrategyUsage> {
    let (first, rest) = strategies.split_first()?;
    Some(rest.iter().fold(first, |best, current| {
        if current.avg_savings > best.avg_savings {
            current
        } else {
            best
        }
    }))
}

pub fn summarize_recommendations(
    recommendations: &[OptimizationRecommendation],
) -> RecommendationsSummary {
    let mut categories = BTreeMap::new();
    for rec in recommendations {
        *categories.entry(rec.kind).or_insert(0) += 1;
    }

    RecommendationsSummary {
        total: recommendations.len(),
        high_priority: recommendations
            .iter()
            .filter(|r| r.priority == Priority::High)
            .count(),
        potential_savings: sum_by(recommendations, |r| r.potential_savings),
        categories,
    }
}

fn performance_metrics(stats: &OptimizationStats) -> PerformanceMetrics {
    let models = &stats.models_breakdown;
    let total_requests = models
        .iter()
        .fold(0u64, |acc, m| acc.saturating_add(m.total_requests));

    // Guarded, unlike the mean inside the optimization score
    let avg_success_rate = if models.is_empty() {
        0.0
    } else {
        sum_by(models, |m| m.success_rate) / models.len() as f64
    };

    let optimized = round_half_up(total_requests as f64 * stats.optimization_rate / 100.0);

    PerformanceMetrics {
        total_requests,
        avg_success_rate,
        // `as` saturates: NaN and negatives become 0
        optimized_requests: optimized as u64,
        cost_reduction: stats.savings_percentage,
    }
}

/// Round to the nearest integer, halves toward positive infinity
/// (2.5 → 3, -2.5 → -2). NaN and infinities pass through.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn sum_by<T>(items: &[T], f: impl Fn(&T) -> f64) -> f64 {
    items.iter().fold(0.0, |acc, item| acc + f(item))
}

/// `min` that returns NaN when either side is NaN
fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

/// `max` that returns NaN when either side is NaN
fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}
