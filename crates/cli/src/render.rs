//! Plain-text summary of an audit report.

use std::fmt::Write;

use stockaudit_audit::{AuditReport, PassReport};
use stockaudit_reconciliation::Classified;

pub fn summary_table(report: &AuditReport) -> String {
    let eri = &report.records.summary;
    let eru = &report.locations.summary;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Warehouse {} ({} scans, session {})",
        report.warehouse, report.scan_count, report.session_id
    );
    let _ = writeln!(out, "{:<14}{:>10}{:>10}", "Metric", "ERI", "ERU");
    let _ = writeln!(
        out,
        "{:<14}{:>10.2}{:>10.2}",
        "Accuracy (%)", eri.accuracy_percent, eru.accuracy_percent
    );
    let _ = writeln!(out, "{:<14}{:>10}{:>10}", "Correct", eri.correct_count, eru.correct_count);
    let _ = writeln!(out, "{:<14}{:>10}{:>10}", "Errors", eri.error_count, eru.error_count);
    let _ = writeln!(out, "{:<14}{:>10}{:>10}", "Total", eri.total, eru.total);
    breakdown_line(&mut out, "ERI", &report.records);
    breakdown_line(&mut out, "ERU", &report.locations);
    out
}

fn breakdown_line<R: Classified>(out: &mut String, name: &str, pass: &PassReport<R>) {
    let counts: Vec<String> = pass
        .breakdown
        .iter()
        .map(|c| format!("{} {}", c.label, c.count))
        .collect();
    let _ = writeln!(out, "{name}: {}", counts.join(", "));
    if let Some(note) = &pass.observation {
        let _ = writeln!(out, "{name} observation: {note}");
    }
}
