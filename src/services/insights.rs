//! Threshold-triggered insights over derived optimization statistics
//!
//! [`insights`] returns a lazy iterator; checks run in a fixed order
//! (performance, diversity, recommendations, success rate) and each stage
//! yields at most one insight. Calling [`insights`] again starts a fresh
//! pass.

use std::fmt;

use serde::Serialize;

use super::optimization::round_half_up;
use crate::types::OptimizationStatsResult;

const EXCELLENT_SCORE: f64 = 80.0;
const GOOD_SCORE: f64 = 60.0;
const LOW_DIVERSITY: f64 = 40.0;
const HIGH_DIVERSITY: f64 = 80.0;
const SAVINGS_WORTH_MENTIONING: f64 = 100.0;
const RELIABLE_SUCCESS_RATE: f64 = 95.0;
const WEAK_SUCCESS_RATE: f64 = 90.0;

/// Which statistic triggered an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Performance,
    Diversity,
    Recommendations,
    Savings,
    SuccessRate,
}

/// Tone of an insight, used for coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightLevel {
    Positive,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub level: InsightLevel,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, level: InsightLevel, message: impl Into<String>) -> Self {
        Self {
            kind,
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Performance,
    Diversity,
    Recommendations,
    Savings,
    SuccessRate,
    Done,
}

/// Lazy insight sequence over a stats result
#[derive(Debug, Clone)]
pub struct Insights<'a> {
    stats: &'a OptimizationStatsResult,
    stage: Stage,
}

/// Start a fresh insight pass over `stats`
pub fn insights(stats: &OptimizationStatsResult) -> Insights<'_> {
    Insights {
        stats,
        stage: Stage::Performance,
    }
}

/// Collect insight messages in order
pub fn compute_insights(stats: &OptimizationStatsResult) -> Vec<String> {
    insights(stats).map(|i| i.message).collect()
}

impl Iterator for Insights<'_> {
    type Item = Insight;

    fn next(&mut self) -> Option<Insight> {
        loop {
            let stage = self.stage;
            self.stage = match stage {
                Stage::Performance => Stage::Diversity,
                Stage::Diversity => Stage::Recommendations,
                Stage::Recommendations => Stage::Savings,
                Stage::Savings => Stage::SuccessRate,
                Stage::SuccessRate | Stage::Done => Stage::Done,
            };

            let insight = match stage {
                Stage::Performance => Some(performance_insight(self.stats.optimization_score)),
                Stage::Diversity => diversity_insight(self.stats.model_diversity_score),
                Stage::Recommendations => {
                    recommendations_insight(self.stats.recommendations_summary.high_priority)
                }
                Stage::Savings => {
                    savings_insight(self.stats.recommendations_summary.potential_savings)
                }
                Stage::SuccessRate => {
                    success_rate_insight(self.stats.performance_metrics.avg_success_rate)
                }
                Stage::Done => return None,
            };

            if insight.is_some() {
                return insight;
            }
        }
    }
}

fn performance_insight(score: f64) -> Insight {
    if score > EXCELLENT_SCORE {
        Insight::new(
            InsightKind::Performance,
            InsightLevel::Positive,
            "Excellent optimization performance! Your system is running efficiently.",
        )
    } else if score > GOOD_SCORE {
        Insight::new(
            InsightKind::Performance,
            InsightLevel::Info,
            "Good optimization performance with room for improvement.",
        )
    } else {
        // NaN lands here too
        Insight::new(
            InsightKind::Performance,
            InsightLevel::Warning,
            "Optimization performance needs attention. Consider reviewing your strategies.",
        )
    }
}

fn diversity_insight(score: f64) -> Option<Insight> {
    if score < LOW_DIVERSITY {
        Some(Insight::new(
            InsightKind::Diversity,
            InsightLevel::Info,
            "Consider diversifying your model usage for better optimization.",
        ))
    } else if score > HIGH_DIVERSITY {
        Some(Insight::new(
            InsightKind::Diversity,
            InsightLevel::Positive,
            "Great model diversity! You're making good use of different models.",
        ))
    } else {
        None
    }
}

fn recommendations_insight(high_priority: usize) -> Option<Insight> {
    (high_priority > 0).then(|| {
        Insight::new(
            InsightKind::Recommendations,
            InsightLevel::Warning,
            format!(
                "You have {} high-priority recommendation(s) that need attention.",
                high_priority
            ),
        )
    })
}

fn savings_insight(potential_savings: f64) -> Option<Insight> {
    (potential_savings > SAVINGS_WORTH_MENTIONING).then(|| {
        Insight::new(
            InsightKind::Savings,
            InsightLevel::Info,
            format!(
                "Potential savings of ${} available through recommendations.",
                round_half_up(potential_savings)
            ),
        )
    })
}

fn success_rate_insight(rate: f64) -> Option<Insight> {
    if rate > RELIABLE_SUCCESS_RATE {
        Some(Insight::new(
            InsightKind::SuccessRate,
            InsightLevel::Positive,
            "Excellent success rate! Your models are performing reliably.",
        ))
    } else if rate < WEAK_SUCCESS_RATE {
        Some(Insight::new(
            InsightKind::SuccessRate,
            InsightLevel::Warning,
            "Success rate could be improved. Review model selection and fallback strategies.",
        ))
    } else {
        None
    }
}
