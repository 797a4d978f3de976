use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockaudit_core::{Aggregate, AggregateRoot, DomainError, SessionId};
use stockaudit_events::Event;
use stockaudit_inventory::TheoreticalInventory;
use stockaudit_reconciliation::{DecomposedScan, ReconciliationEngine};

use crate::report::{AuditReport, PassReport};

/// The two reconciliation passes an observation note can be attached to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditPass {
    /// Record accuracy (ERI).
    Records,
    /// Location accuracy (ERU).
    Locations,
}

/// One accepted scan, as stored in the session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedScan {
    /// 1-based position in the current scan sequence.
    pub sequence: u64,
    pub code: String,
    pub recorded_at: DateTime<Utc>,
}

/// Result of submitting one scan, for operator feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFeedback {
    pub sequence: u64,
    pub code: String,
    pub decomposition: DecomposedScan,
}

impl ScanFeedback {
    pub fn is_match(&self) -> bool {
        self.decomposition.is_match()
    }
}

impl core::fmt::Display for ScanFeedback {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match (&self.decomposition.key, &self.decomposition.location) {
            (Some(key), Some(location)) => {
                write!(f, "#{} {}: key {key}, location {location}", self.sequence, self.code)
            }
            _ => write!(f, "#{} {}: no match", self.sequence, self.code),
        }
    }
}

/// Aggregate root: the scan log of one warehouse selection.
///
/// Holds the reconciliation engine built for the warehouse, so both passes
/// always run against the snapshot the scans were taken for.
#[derive(Debug, Clone)]
pub struct AuditSession {
    id: SessionId,
    opened_at: DateTime<Utc>,
    engine: ReconciliationEngine,
    scans: Vec<RecordedScan>,
    record_note: Option<String>,
    location_note: Option<String>,
    version: u64,
}

impl AuditSession {
    pub fn open(id: SessionId, inventory: TheoreticalInventory, opened_at: DateTime<Utc>) -> Self {
        Self {
            id,
            opened_at,
            engine: ReconciliationEngine::new(inventory),
            scans: Vec::new(),
            record_note: None,
            location_note: None,
            version: 0,
        }
    }

    pub fn warehouse(&self) -> &str {
        self.engine.inventory().warehouse()
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    pub fn scans(&self) -> &[RecordedScan] {
        &self.scans
    }

    pub fn scan_codes(&self) -> impl Iterator<Item = &str> {
        self.scans.iter().map(|s| s.code.as_str())
    }

    pub fn observation(&self, pass: AuditPass) -> Option<&str> {
        match pass {
            AuditPass::Records => self.record_note.as_deref(),
            AuditPass::Locations => self.location_note.as_deref(),
        }
    }

    /// Run both passes over the current scan sequence.
    pub fn report(&self, generated_at: DateTime<Utc>) -> AuditReport {
        let records = self.engine.reconcile_records(self.scan_codes());
        let locations = self.engine.reconcile_locations(self.scan_codes());

        AuditReport {
            session_id: self.id,
            warehouse: self.warehouse().to_string(),
            generated_at,
            scan_count: self.scans.len(),
            records: PassReport::new(records, self.record_note.clone()),
            locations: PassReport::new(locations, self.location_note.clone()),
        }
    }
}

impl AggregateRoot for AuditSession {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RecordScan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordScan {
    pub session_id: SessionId,
    pub code: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ClearScans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearScans {
    pub session_id: SessionId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: NoteObservation. A blank note clears the pass's observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteObservation {
    pub session_id: SessionId,
    pub pass: AuditPass,
    pub text: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionCommand {
    RecordScan(RecordScan),
    ClearScans(ClearScans),
    NoteObservation(NoteObservation),
}

/// Event: ScanRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecorded {
    pub session_id: SessionId,
    /// Trimmed scan code.
    pub code: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ScansCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScansCleared {
    pub session_id: SessionId,
    pub cleared: usize,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ObservationNoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationNoted {
    pub session_id: SessionId,
    pub pass: AuditPass,
    /// `None` clears the observation.
    pub text: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    ScanRecorded(ScanRecorded),
    ScansCleared(ScansCleared),
    ObservationNoted(ObservationNoted),
}

impl Event for SessionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::ScanRecorded(_) => "audit.scan.recorded",
            SessionEvent::ScansCleared(_) => "audit.scans.cleared",
            SessionEvent::ObservationNoted(_) => "audit.observation.noted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SessionEvent::ScanRecorded(e) => e.occurred_at,
            SessionEvent::ScansCleared(e) => e.occurred_at,
            SessionEvent::ObservationNoted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for AuditSession {
    type Command = SessionCommand;
    type Event = SessionEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            SessionEvent::ScanRecorded(e) => {
                let sequence = self.scans.len() as u64 + 1;
                self.scans.push(RecordedScan {
                    sequence,
                    code: e.code.clone(),
                    recorded_at: e.occurred_at,
                });
            }
            SessionEvent::ScansCleared(_) => self.scans.clear(),
            SessionEvent::ObservationNoted(e) => {
                let slot = match e.pass {
                    AuditPass::Records => &mut self.record_note,
                    AuditPass::Locations => &mut self.location_note,
                };
                *slot = e.text.clone();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SessionCommand::RecordScan(cmd) => self.handle_record(cmd),
            SessionCommand::ClearScans(cmd) => self.handle_clear(cmd),
            SessionCommand::NoteObservation(cmd) => self.handle_note(cmd),
        }
    }
}

impl AuditSession {
    fn ensure_session(&self, session_id: SessionId) -> Result<(), DomainError> {
        if self.id != session_id {
            return Err(DomainError::conflict(format!(
                "command addressed to session {session_id}, active session is {}",
                self.id
            )));
        }
        Ok(())
    }

    fn handle_record(&self, cmd: &RecordScan) -> Result<Vec<SessionEvent>, DomainError> {
        self.ensure_session(cmd.session_id)?;

        let code = cmd.code.trim();
        if code.is_empty() {
            return Err(DomainError::validation("scan code cannot be blank"));
        }

        Ok(vec![SessionEvent::ScanRecorded(ScanRecorded {
            session_id: self.id,
            code: code.to_string(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_clear(&self, cmd: &ClearScans) -> Result<Vec<SessionEvent>, DomainError> {
        self.ensure_session(cmd.session_id)?;

        // Empty log: no event.
        if self.scans.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![SessionEvent::ScansCleared(ScansCleared {
            session_id: self.id,
            cleared: self.scans.len(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_note(&self, cmd: &NoteObservation) -> Result<Vec<SessionEvent>, DomainError> {
        self.ensure_session(cmd.session_id)?;

        let text = Some(cmd.text.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        if text.as_deref() == self.observation(cmd.pass) {
            return Ok(Vec::new());
        }

        Ok(vec![SessionEvent::ObservationNoted(ObservationNoted {
            session_id: self.id,
            pass: cmd.pass,
            text,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use stockaudit_inventory::TheoreticalItem;
    use stockaudit_reconciliation::{LocationStatus, RecordStatus};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap()
    }

    fn session() -> AuditSession {
        let inventory = TheoreticalInventory::from_items(
            "MAIN",
            vec![
                TheoreticalItem::new("A1", "R1", dec!(10), ["R1A-B-1"]).unwrap(),
                TheoreticalItem::new("B2", "X", dec!(2), ["R1A-B-9"]).unwrap(),
            ],
        )
        .unwrap();
        AuditSession::open(SessionId::new(), inventory, t0())
    }

    fn execute(session: &mut AuditSession, command: SessionCommand) -> Result<Vec<SessionEvent>, DomainError> {
        let events = session.handle(&command)?;
        for e in &events {
            session.apply(e);
        }
        Ok(events)
    }

    fn record(session: &mut AuditSession, code: &str) -> Result<Vec<SessionEvent>, DomainError> {
        let cmd = SessionCommand::RecordScan(RecordScan {
            session_id: session.id,
            code: code.to_string(),
            occurred_at: t0(),
        });
        execute(session, cmd)
    }

    #[test]
    fn scans_are_trimmed_and_appended_in_order() {
        let mut s = session();
        record(&mut s, "  A1R1R1A-B-1 ").unwrap();
        record(&mut s, "GARBAGE").unwrap();

        let codes: Vec<&str> = s.scan_codes().collect();
        assert_eq!(codes, vec!["A1R1R1A-B-1", "GARBAGE"]);
        assert_eq!(s.scans()[1].sequence, 2);
        assert_eq!(s.version(), 2);
    }

    #[test]
    fn blank_scan_is_rejected_without_events() {
        let mut s = session();
        let err = record(&mut s, "   ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(s.scans().is_empty());
        assert_eq!(s.version(), 0);
    }

    #[test]
    fn command_for_another_session_is_a_conflict() {
        let s = session();
        let cmd = SessionCommand::RecordScan(RecordScan {
            session_id: SessionId::new(),
            code: "A1R1R1A-B-1".to_string(),
            occurred_at: t0(),
        });
        assert!(matches!(s.handle(&cmd), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn clearing_resets_sequence_numbers() {
        let mut s = session();
        let id = s.id;
        record(&mut s, "A1R1R1A-B-1").unwrap();
        record(&mut s, "A1R1R1A-B-1").unwrap();

        let events = execute(
            &mut s,
            SessionCommand::ClearScans(ClearScans {
                session_id: id,
                occurred_at: t0(),
            }),
        )
        .unwrap();
        assert!(matches!(&events[..], [SessionEvent::ScansCleared(e)] if e.cleared == 2));
        assert!(s.scans().is_empty());

        record(&mut s, "B2XR1A-B-9").unwrap();
        assert_eq!(s.scans()[0].sequence, 1);
    }

    #[test]
    fn clearing_an_empty_log_emits_nothing() {
        let mut s = session();
        let id = s.id;
        let events = execute(
            &mut s,
            SessionCommand::ClearScans(ClearScans {
                session_id: id,
                occurred_at: t0(),
            }),
        )
        .unwrap();
        assert!(events.is_empty());
        assert_eq!(s.version(), 0);
    }

    #[test]
    fn observations_are_trimmed_and_blank_clears() {
        let mut s = session();
        let id = s.id;
        let note = |text: &str| {
            SessionCommand::NoteObservation(NoteObservation {
                session_id: id,
                pass: AuditPass::Records,
                text: text.to_string(),
                occurred_at: t0(),
            })
        };

        execute(&mut s, note("  recount aisle 3 ")).unwrap();
        assert_eq!(s.observation(AuditPass::Records), Some("recount aisle 3"));
        assert_eq!(s.observation(AuditPass::Locations), None);

        // Same text again changes nothing.
        assert!(execute(&mut s, note("recount aisle 3")).unwrap().is_empty());

        execute(&mut s, note("")).unwrap();
        assert_eq!(s.observation(AuditPass::Records), None);
    }

    #[test]
    fn report_runs_both_passes_over_the_log() {
        let mut s = session();
        for code in ["A1R1R1A-B-1", "A1R1R1A-B-1", "A1R1R1A-B-9"] {
            record(&mut s, code).unwrap();
        }

        let report = s.report(t0());
        assert_eq!(report.warehouse, "MAIN");
        assert_eq!(report.scan_count, 3);

        let a1 = report.records.rows.iter().find(|r| r.key.as_str() == "A1_R1").unwrap();
        assert_eq!(a1.physical_count, 3);
        assert_eq!(a1.status, RecordStatus::Shortage);

        let statuses: Vec<_> = report.locations.rows.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                LocationStatus::LocationCorrect,
                LocationStatus::LocationCorrect,
                LocationStatus::LocationIncorrect,
            ]
        );
    }

    #[test]
    fn event_types_are_stable() {
        let e = SessionEvent::ScanRecorded(ScanRecorded {
            session_id: SessionId::new(),
            code: "X".to_string(),
            occurred_at: t0(),
        });
        assert_eq!(e.event_type(), "audit.scan.recorded");
        assert_eq!(e.version(), 1);
        assert_eq!(e.occurred_at(), t0());
    }
}
