//! Criterion benchmarks for statistics derivation and insights

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::path::PathBuf;

use optiboard::services::client::parse_summary;
use optiboard::services::{compute_insights, compute_stats};
use optiboard::types::{
    DashboardSummary, ModelBreakdown, OptimizationRecommendation, OptimizationStats, Priority,
    RecommendationType, StrategyName, StrategyUsage,
};

/// Synthetic summary with `models` models and ten times as many recommendations
fn make_summary(models: usize) -> DashboardSummary {
    let share = 100.0 / models as f64;
    let models_breakdown = (0..models)
        .map(|i| ModelBreakdown {
            model_name: format!("model-{}", i),
            usage_percentage: share,
            avg_cost: 0.001 * (i % 17) as f64,
            savings_percentage: (i * 7 % 100) as f64,
            success_rate: 90.0 + (i % 10) as f64,
            total_requests: 1000 + i as u64,
        })
        .collect();

    let strategies_used = [StrategyName::CostFirst, StrategyName::Balanced, StrategyName::QualityFirst]
        .into_iter()
        .enumerate()
        .map(|(i, strategy_name)| StrategyUsage {
            strategy_name,
            requests: 500 * (i as u64 + 1),
            avg_savings: 60.0 - 20.0 * i as f64,
            avg_cost: 0.005 * (i as f64 + 1.0),
        })
        .collect();

    let kinds = [
        RecommendationType::Strategy,
        RecommendationType::Model,
        RecommendationType::ApiKey,
        RecommendationType::General,
    ];
    let priorities = [Priority::High, Priority::Medium, Priority::Low];
    let created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let recommendations = (0..models * 10)
        .map(|i| OptimizationRecommendation {
            id: format!("rec-{}", i),
            kind: kinds[i % kinds.len()],
            priority: priorities[i % priorities.len()],
            potential_savings: (i % 50) as f64,
            created_at,
            title: String::new(),
            description: String::new(),
        })
        .collect();

    DashboardSummary {
        optimization_stats: Some(OptimizationStats {
            savings_percentage: 42.0,
            optimization_rate: 75.0,
            total_savings: 0.0,
            models_breakdown,
            strategies_used,
            recommendations,
        }),
        ..Default::default()
    }
}

fn bench_compute_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_stats");

    for models in [4usize, 64, 1024] {
        let summary = make_summary(models);
        group.throughput(Throughput::Elements(models as u64));
        group.bench_with_input(BenchmarkId::new("models", models), &summary, |b, summary| {
            b.iter(|| compute_stats(black_box(Some(summary))));
        });
    }

    group.finish();
}

fn bench_insights(c: &mut Criterion) {
    let stats = compute_stats(Some(&make_summary(64)));
    c.bench_function("compute_insights", |b| {
        b.iter(|| compute_insights(black_box(&stats)));
    });
}

fn bench_parse_fixture(c: &mut Criterion) {
    let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("summary.json");
    let bytes = match std::fs::read(&fixture) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Warning: fixture {} unreadable: {}", fixture.display(), e);
            return;
        }
    };

    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("summary_fixture", |b| {
        b.iter(|| {
            // simd-json parses in place
            let mut buf = bytes.clone();
            parse_summary(black_box(&mut buf))
        });
    });
    group.finish();
}

criterion_group!(benches, bench_compute_stats, bench_insights, bench_parse_fixture);
criterion_main!(benches);
