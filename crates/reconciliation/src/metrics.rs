//! Accuracy metrics over classified reconciliation rows.

use serde::{Deserialize, Serialize};

/// Status vocabulary of one reconciliation pass.
pub trait PassStatus: Copy + Eq + core::fmt::Debug + Serialize + 'static {
    /// Every status, in chart order.
    const ALL: &'static [Self];

    /// Does this status count as correct for the pass accuracy?
    fn is_correct(self) -> bool;

    /// Human-readable label.
    fn label(self) -> &'static str;

    /// Accuracy percentage for a non-empty row set.
    fn accuracy(correct: usize, _error: usize, total: usize) -> f64 {
        correct as f64 / total as f64 * 100.0
    }
}

/// A reconciliation row carrying a pass status.
pub trait Classified {
    type Status: PassStatus;

    fn status(&self) -> Self::Status;
}

/// Accuracy summary of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracySummary {
    pub accuracy_percent: f64,
    pub correct_count: usize,
    pub error_count: usize,
    pub total: usize,
}

impl AccuracySummary {
    pub fn empty() -> Self {
        Self {
            accuracy_percent: 0.0,
            correct_count: 0,
            error_count: 0,
            total: 0,
        }
    }
}

/// Summarize a full row set.
///
/// An empty row set has 0% accuracy.
pub fn aggregate<R: Classified>(rows: &[R]) -> AccuracySummary {
    let total = rows.len();
    if total == 0 {
        return AccuracySummary::empty();
    }

    let correct_count = rows.iter().filter(|r| r.status().is_correct()).count();
    let error_count = total - correct_count;

    AccuracySummary {
        accuracy_percent: R::Status::accuracy(correct_count, error_count, total),
        correct_count,
        error_count,
        total,
    }
}

/// Chart-ready count of one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount<S> {
    pub status: S,
    pub label: &'static str,
    pub count: usize,
}

/// Count rows per status. Every status of the pass is listed, zero counts
/// included, in [`PassStatus::ALL`] order.
pub fn breakdown<R: Classified>(rows: &[R]) -> Vec<StatusCount<R::Status>> {
    R::Status::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            label: status.label(),
            count: rows.iter().filter(|r| r.status() == status).count(),
        })
        .collect()
}
