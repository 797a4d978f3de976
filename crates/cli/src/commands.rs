use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};

use stockaudit_audit::{AuditDesk, AuditPass, AuditReport};
use stockaudit_inventory::parse_json;

/// Operator observations passed on the command line.
#[derive(Debug, Default)]
pub struct Notes {
    pub records: Option<String>,
    pub locations: Option<String>,
}

pub fn open_desk(stock: &Path) -> Result<AuditDesk> {
    let text = fs::read_to_string(stock)
        .with_context(|| format!("failed to read stock listing {}", stock.display()))?;
    let rows = parse_json(&text)
        .with_context(|| format!("failed to parse stock listing {}", stock.display()))?;
    let desk = AuditDesk::new(rows).with_context(|| format!("no stock in {}", stock.display()))?;
    Ok(desk)
}

/// Open the listing and make `warehouse` the active session.
pub fn open_session(stock: &Path, warehouse: &str) -> Result<AuditDesk> {
    let mut desk = open_desk(stock)?;
    desk.select_warehouse(warehouse)
        .with_context(|| format!("cannot audit warehouse '{warehouse}'"))?;
    Ok(desk)
}

pub fn list_warehouses<W: Write>(desk: &AuditDesk, out: &mut W) -> Result<()> {
    for warehouse in desk.warehouses() {
        writeln!(out, "{warehouse}")?;
    }
    Ok(())
}

/// Non-blank lines of a scan file, in order.
pub fn scan_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// Submit every scan of `scans`, attach the notes and build the report.
pub fn replay(desk: &mut AuditDesk, scans: &Path, notes: &Notes) -> Result<AuditReport> {
    let text = fs::read_to_string(scans)
        .with_context(|| format!("failed to read scan file {}", scans.display()))?;
    replay_text(desk, &text, notes)
}

pub fn replay_text(desk: &mut AuditDesk, scans: &str, notes: &Notes) -> Result<AuditReport> {
    let mut unmatched = 0usize;
    for code in scan_lines(scans) {
        if !desk.submit_scan(code)?.is_match() {
            unmatched += 1;
        }
    }
    if unmatched > 0 {
        tracing::warn!(unmatched, "scans did not decompose into key and location");
    }

    if let Some(text) = &notes.records {
        desk.note_observation(AuditPass::Records, text)?;
    }
    if let Some(text) = &notes.locations {
        desk.note_observation(AuditPass::Locations, text)?;
    }

    Ok(desk.report()?)
}

pub fn write_report(report: &AuditReport, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("failed to write report to {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

/// Interactive scanning: one scan per line until `:quit` or end of input.
///
/// `:reset` clears the scans, `:report` prints the JSON report. Rejected
/// input is reported and the loop goes on.
pub fn scan_loop<R: BufRead, W: Write>(desk: &mut AuditDesk, input: R, out: &mut W) -> Result<()> {
    for line in input.lines() {
        let line = line.context("failed to read scan input")?;
        match line.trim() {
            "" => continue,
            ":quit" => break,
            ":reset" => {
                let cleared = desk.reset()?;
                writeln!(out, "cleared {cleared} scans")?;
            }
            ":report" => {
                let report = desk.report()?;
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            }
            code => match desk.submit_scan(code) {
                Ok(feedback) => writeln!(out, "{feedback}")?,
                Err(err) => writeln!(out, "rejected: {err}")?,
            },
        }
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LISTING: &str = r#"[
        {"WAREHOUSE": "MAIN", "PRODUCT_CODE": "A1", "REFERENCE": "R1", "QUANTITY": 2, "LOCATION": "R1A-B-1"},
        {"WAREHOUSE": "MAIN", "PRODUCT_CODE": "B2", "REFERENCE": "X", "QUANTITY": 1, "LOCATION": "R1A-B-9"},
        {"WAREHOUSE": "EAST", "PRODUCT_CODE": "C3", "REFERENCE": "Y", "QUANTITY": 1, "LOCATION": "R2-C-3"}
    ]"#;

    fn desk() -> AuditDesk {
        let mut desk = AuditDesk::new(parse_json(LISTING).unwrap()).unwrap();
        desk.select_warehouse("MAIN").unwrap();
        desk
    }

    fn run_loop(desk: &mut AuditDesk, input: &str) -> String {
        let mut out = Vec::new();
        scan_loop(desk, Cursor::new(input), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn lists_warehouses_one_per_line() {
        let desk = AuditDesk::new(parse_json(LISTING).unwrap()).unwrap();
        let mut out = Vec::new();
        list_warehouses(&desk, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "EAST\nMAIN\n");
    }

    #[test]
    fn scan_file_skips_blank_lines() {
        let lines: Vec<&str> = scan_lines("A1R1R1A-B-1\n\n  \r\n B2XR1A-B-9 \n").collect();
        assert_eq!(lines, vec!["A1R1R1A-B-1", "B2XR1A-B-9"]);
    }

    #[test]
    fn replay_builds_report_with_notes() {
        let mut desk = desk();
        let notes = Notes {
            records: Some("second count pending".to_string()),
            locations: None,
        };
        let report = replay_text(&mut desk, "A1R1R1A-B-1\nA1R1R1A-B-1\nB2XR1A-B-9\n", &notes).unwrap();

        assert_eq!(report.scan_count, 3);
        assert_eq!(report.records.summary.accuracy_percent, 100.0);
        assert_eq!(report.records.observation.as_deref(), Some("second count pending"));
        assert_eq!(report.locations.observation, None);
    }

    #[test]
    fn scan_loop_gives_feedback_and_handles_commands() {
        let mut desk = desk();
        let out = run_loop(&mut desk, "A1R1R1A-B-1\nNOPE\n\n:reset\nB2XR1A-B-9\n:quit\nA1R1R1A-B-1\n");

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "#1 A1R1R1A-B-1: key A1_R1, location R1A-B-1",
                "#2 NOPE: no match",
                "cleared 2 scans",
                "#1 B2XR1A-B-9: key B2_X, location R1A-B-9",
            ]
        );
        // Input after :quit is ignored.
        assert_eq!(desk.active_session().unwrap().scans().len(), 1);
    }

    #[test]
    fn scan_loop_prints_report_on_request() {
        let mut desk = desk();
        let out = run_loop(&mut desk, "B2XR1A-B-9\n:report\n");
        let json_start = out.find('{').unwrap();
        let value: serde_json::Value = serde_json::from_str(&out[json_start..]).unwrap();
        assert_eq!(value["warehouse"], "MAIN");
        assert_eq!(value["scan_count"], 1);
    }
}
