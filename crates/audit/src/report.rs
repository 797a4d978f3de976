//! Report model handed to the reporting layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockaudit_core::SessionId;
use stockaudit_reconciliation::{
    AccuracySummary, Classified, LocationRow, RecordRow, StatusCount, aggregate, breakdown,
};

/// One reconciliation pass: its rows, summary and chart breakdown.
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "R: Serialize"))]
pub struct PassReport<R: Classified> {
    pub rows: Vec<R>,
    pub summary: AccuracySummary,
    pub breakdown: Vec<StatusCount<R::Status>>,
    /// Operator observation attached to this pass.
    pub observation: Option<String>,
}

impl<R: Classified> PassReport<R> {
    pub fn new(rows: Vec<R>, observation: Option<String>) -> Self {
        let summary = aggregate(&rows);
        let breakdown = breakdown(&rows);
        Self {
            rows,
            summary,
            breakdown,
            observation,
        }
    }
}

/// Both passes of one session, keyed by the active warehouse.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub session_id: SessionId,
    pub warehouse: String,
    pub generated_at: DateTime<Utc>,
    pub scan_count: usize,
    pub records: PassReport<RecordRow>,
    pub locations: PassReport<LocationRow>,
}
