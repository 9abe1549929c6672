//! Aggregate statistics over decision records.
//!
//! Every aggregate divides by `max(count, 1)`, so empty input yields `0.0`
//! instead of `NaN`.

use serde::Serialize;

/// Divides `numerator` by `denominator`, flooring the denominator at 1.
pub fn guarded_divide(numerator: f64, denominator: usize) -> f64 {
    numerator / denominator.max(1) as f64
}

/// Snapshot of the dashboard figures, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionSummary {
    pub total: usize,
    pub with_outcome: usize,
    pub pending: usize,
    /// Percentage in `0.0..=100.0`.
    pub success_rate: f64,
    pub average_happiness: f64,
    pub average_stress: f64,
}
