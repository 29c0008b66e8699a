//! Boundary validation for dashboard summaries
//!
//! Off by default: the aggregator accepts any well-typed payload. With
//! strict mode on, payloads that break the documented ranges are rejected
//! before any statistics are derived.

use std::collections::HashSet;

use crate::types::{DashboardSummary, OptiboardError, Result};

/// Check ranges and uniqueness constraints of a summary
pub fn validate_summary(summary: &DashboardSummary) -> Result<()> {
    let Some(stats) = &summary.optimization_stats else {
        return Ok(());
    };

    check_finite("savings_percentage", stats.savings_percentage)?;
    check_percentage("optimization_rate", stats.optimization_rate)?;

    let mut names = HashSet::new();
    for model in &stats.models_breakdown {
        if !names.insert(model.model_name.as_str()) {
            return Err(malformed(format!(
                "duplicate model_name '{}'",
                model.model_name
            )));
        }
        let field = |name: &str| format!("models_breakdown[{}].{}", model.model_name, name);
        check_percentage(&field("usage_percentage"), model.usage_percentage)?;
        check_non_negative(&field("avg_cost"), model.avg_cost)?;
        check_finite(&field("savings_percentage"), model.savings_percentage)?;
        check_percentage(&field("success_rate"), model.success_rate)?;
    }

    for strategy in &stats.strategies_used {
        let label = strategy.strategy_name.label();
        check_finite(&format!("strategies_used[{}].avg_savings", label), strategy.avg_savings)?;
        check_non_negative(&format!("strategies_used[{}].avg_cost", label), strategy.avg_cost)?;
    }

    let mut ids = HashSet::new();
    for rec in &stats.recommendations {
        if !ids.insert(rec.id.as_str()) {
            return Err(malformed(format!("duplicate recommendation id '{}'", rec.id)));
        }
        check_non_negative(
            &format!("recommendations[{}].potential_savings", rec.id),
            rec.potential_savings,
        )?;
    }

    Ok(())
}

fn malformed(message: String) -> OptiboardError {
    OptiboardError::MalformedInput(message)
}

fn check_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(malformed(format!("{} is not a finite number", field)))
    }
}

fn check_percentage(field: &str, value: f64) -> Result<()> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(malformed(format!("{} = {} is outside [0, 100]", field, value)))
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(malformed(format!("{} = {} must be >= 0", field, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ModelBreakdown, OptimizationStats};

    fn make_model(name: &str, usage: f64, success: f64) -> ModelBreakdown {
        ModelBreakdown {
            model_name: name.to_string(),
            usage_percentage: usage,
            avg_cost: 0.01,
            savings_percentage: -5.0,
            success_rate: success,
            total_requests: 10,
        }
    }

    fn make_summary(models: Vec<ModelBreakdown>) -> DashboardSummary {
        DashboardSummary {
            optimization_stats: Some(OptimizationStats {
                savings_percentage: 20.0,
                optimization_rate: 35.0,
                total_savings: 0.0,
                models_breakdown: models,
                strategies_used: Vec::new(),
                recommendations: Vec::new(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_without_stats_is_valid() {
        assert!(validate_summary(&DashboardSummary::default()).is_ok());
    }

    #[test]
    fn test_valid_summary_passes() {
        let summary = make_summary(vec![make_model("a", 60.0, 99.0), make_model("b", 40.0, 90.0)]);
        assert!(validate_summary(&summary).is_ok());
    }

    #[test]
    fn test_success_rate_out_of_range() {
        let summary = make_summary(vec![make_model("a", 60.0, 120.0)]);
        let err = validate_summary(&summary).unwrap_err();
        assert!(matches!(err, OptiboardError::MalformedInput(_)));
        assert!(err.to_string().contains("models_breakdown[a].success_rate"));
    }

    #[test]
    fn test_duplicate_model_name_rejected() {
        let summary = make_summary(vec![make_model("a", 50.0, 90.0), make_model("a", 50.0, 90.0)]);
        let err = validate_summary(&summary).unwrap_err();
        assert!(err.to_string().contains("duplicate model_name 'a'"));
    }

    #[test]
    fn test_nan_optimization_rate_rejected() {
        let mut summary = make_summary(Vec::new());
        if let Some(stats) = summary.optimization_stats.as_mut() {
            stats.optimization_rate = f64::NAN;
        }
        assert!(validate_summary(&summary).is_err());
    }

    #[test]
    fn test_negative_savings_percentage_allowed() {
        let mut summary = make_summary(vec![make_model("a", 100.0, 90.0)]);
        if let Some(stats) = summary.optimization_stats.as_mut() {
            stats.savings_percentage = -12.0;
        }
        assert!(validate_summary(&summary).is_ok());
    }
}
