//! Identity-keyed memo for derived statistics
//!
//! Recomputes only when the caller hands over a different `Arc` than last
//! time. Equal-but-distinct summaries still recompute; the key is the
//! allocation, not the contents.

use std::sync::Arc;

use super::optimization::OptimizationAggregator;
use crate::types::{DashboardSummary, OptimizationStatsResult};

pub struct StatsMemo {
    aggregator: OptimizationAggregator,
    key: Option<Arc<DashboardSummary>>,
    value: OptimizationStatsResult,
    computations: u64,
}

impl StatsMemo {
    pub fn new(aggregator: OptimizationAggregator) -> Self {
        Self {
            aggregator,
            key: None,
            value: OptimizationStatsResult::default(),
            computations: 0,
        }
    }

    /// Stats for `data`, recomputed only when its identity changed
    pub fn get(&mut self, data: Option<&Arc<DashboardSummary>>) -> &OptimizationStatsResult {
        let unchanged = match (&self.key, data) {
            (Some(cached), Some(current)) => Arc::ptr_eq(cached, current),
            (None, None) => true,
            _ => false,
        };

        if !unchanged {
            self.value = self.aggregator.compute(data.map(|d| d.as_ref()));
            self.key = data.cloned();
            self.computations = self.computations.saturating_add(1);
        }

        &self.value
    }

    /// Last computed stats without touching the key
    pub fn current(&self) -> &OptimizationStatsResult {
        &self.value
    }

    /// Number of times the aggregator actually ran
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

impl Default for StatsMemo {
    fn default() -> Self {
        Self::new(OptimizationAggregator::default())
    }
}
