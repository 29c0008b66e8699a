//! Plain-text and JSON reports for the non-interactive commands

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::format::{format_number, format_percent, format_score, format_usd};
use crate::services::optimization::performance_score;
use crate::services::{Insight, InsightLevel, OptimizationAggregator, SummarySnapshot};
use crate::types::OptimizationStatsResult;

const LABEL_WIDTH: usize = 22;

/// JSON envelope for `stats`
#[derive(Debug, Serialize)]
pub struct StatsReport<'a> {
    pub source: &'a str,
    pub stale: bool,
    pub stats: &'a OptimizationStatsResult,
}

/// One line of `history`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryRow {
    pub fetched_at: DateTime<Utc>,
    pub source: String,
    pub optimization_score: f64,
    pub model_diversity_score: f64,
    pub cost_reduction: f64,
    pub potential_savings: f64,
}

impl HistoryRow {
    pub fn from_snapshot(snapshot: &SummarySnapshot, aggregator: &OptimizationAggregator) -> Self {
        let stats = aggregator.compute(Some(&snapshot.summary));
        Self {
            fetched_at: snapshot.fetched_at,
            source: snapshot.source.clone(),
            optimization_score: stats.optimization_score,
            model_diversity_score: stats.model_diversity_score,
            cost_reduction: stats.performance_metrics.cost_reduction,
            potential_savings: stats.recommendations_summary.potential_savings,
        }
    }
}

fn row(label: &str, value: impl AsRef<str>) -> String {
    format!("{:<width$}{}\n", label, value.as_ref(), width = LABEL_WIDTH)
}

pub fn render_stats(source: &str, stale: bool, stats: &OptimizationStatsResult) -> String {
    let mut out = String::new();
    let marker = if stale { " [cached]" } else { "" };
    out.push_str(&format!("Optimization statistics ({}){}\n", source, marker));
    out.push_str(&"─".repeat(48));
    out.push('\n');

    out.push_str(&row("Optimization score", format_score(stats.optimization_score)));
    out.push_str(&row("Model diversity", format_score(stats.model_diversity_score)));

    let top = stats
        .top_performing_model
        .as_ref()
        .map(|m| format!("{} (score {})", m.model_name, format_score(performance_score(m))))
        .unwrap_or_else(|| "-".to_string());
    out.push_str(&row("Top model", top));

    let strategy = stats
        .most_efficient_strategy
        .as_ref()
        .map(|s| {
            format!(
                "{} (avg savings {})",
                s.strategy_name.label(),
                format_percent(s.avg_savings)
            )
        })
        .unwrap_or_else(|| "-".to_string());
    out.push_str(&row("Most efficient", strategy));

    let metrics = &stats.performance_metrics;
    out.push_str(&row(
        "Requests",
        format!(
            "{} total, {} optimized",
            format_number(metrics.total_requests),
            format_number(metrics.optimized_requests)
        ),
    ));
    out.push_str(&row("Avg success rate", format_percent(metrics.avg_success_rate)));
    out.push_str(&row("Cost reduction", format_percent(metrics.cost_reduction)));

    let recs = &stats.recommendations_summary;
    out.push_str(&row(
        "Recommendations",
        format!(
            "{} total, {} high priority, {} potential",
            recs.total,
            recs.high_priority,
            format_usd(recs.potential_savings)
        ),
    ));
    for (kind, count) in &recs.categories {
        out.push_str(&format!("  {}: {}\n", kind.label(), count));
    }

    out
}

pub fn render_insights(insights: &[Insight]) -> String {
    if insights.is_empty() {
        return "No insights.\n".to_string();
    }

    insights
        .iter()
        .map(|i| {
            let marker = match i.level {
                InsightLevel::Positive => "+",
                InsightLevel::Info => "*",
                InsightLevel::Warning => "!",
            };
            format!("{} {}\n", marker, i.message)
        })
        .collect()
}

pub fn render_history(rows: &[HistoryRow]) -> String {
    if rows.is_empty() {
        return "No snapshots cached yet.\n".to_string();
    }

    let mut out = format!(
        "{:<18}{:>8}{:>11}{:>11}{:>12}\n",
        "Fetched (UTC)", "Score", "Diversity", "Savings", "Potential"
    );
    for r in rows {
        out.push_str(&format!(
            "{:<18}{:>8}{:>11}{:>11}{:>12}\n",
            r.fetched_at.format("%Y-%m-%d %H:%M"),
            format_score(r.optimization_score),
            format_score(r.model_diversity_score),
            format_percent(r.cost_reduction),
            format_usd(r.potential_savings)
        ));
    }
    out
}
