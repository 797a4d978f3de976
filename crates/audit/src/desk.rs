use chrono::Utc;

use stockaudit_core::{Aggregate, AggregateRoot, DomainError, DomainResult, SessionId};
use stockaudit_events::{Event, EventEnvelope};
use stockaudit_inventory::{StockRow, TheoreticalInventory, warehouses};

use crate::report::AuditReport;
use crate::session::{
    AuditPass, AuditSession, ClearScans, NoteObservation, RecordScan, ScanFeedback, SessionCommand,
    SessionEvent,
};

/// Single owner of the stock listing and the current warehouse session.
///
/// Every mutation takes `&mut self`; hosts that share a desk across threads
/// wrap it in one lock.
#[derive(Debug)]
pub struct AuditDesk {
    rows: Vec<StockRow>,
    warehouses: Vec<String>,
    session: Option<AuditSession>,
    /// Events of the current session, sequence numbers starting at 1.
    journal: Vec<EventEnvelope<SessionEvent>>,
}

impl AuditDesk {
    /// Take ownership of a parsed stock listing. An empty listing is rejected.
    pub fn new(rows: Vec<StockRow>) -> DomainResult<Self> {
        if rows.is_empty() {
            tracing::warn!("stock listing holds no rows");
            return Err(DomainError::validation("stock listing holds no rows"));
        }

        let warehouses = warehouses(&rows);
        tracing::info!(rows = rows.len(), warehouses = warehouses.len(), "stock listing loaded");
        Ok(Self {
            rows,
            warehouses,
            session: None,
            journal: Vec::new(),
        })
    }

    /// Warehouses present in the listing, sorted.
    pub fn warehouses(&self) -> &[String] {
        &self.warehouses
    }

    pub fn session(&self) -> Option<&AuditSession> {
        self.session.as_ref()
    }

    pub fn journal(&self) -> &[EventEnvelope<SessionEvent>] {
        &self.journal
    }

    /// Make `name` the active warehouse.
    ///
    /// Re-selecting the active warehouse keeps its session. Any other
    /// warehouse discards the session (scans, notes, journal) and rebuilds
    /// the lookup structures from the listing.
    pub fn select_warehouse(&mut self, name: &str) -> DomainResult<&AuditSession> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("warehouse name cannot be blank"));
        }

        let active = self.session.as_ref().is_some_and(|s| s.warehouse() == name);
        if !active {
            if !self.warehouses.iter().any(|w| w == name) {
                tracing::warn!(warehouse = name, "unknown warehouse selected");
                return Err(DomainError::not_found(format!("warehouse '{name}'")));
            }

            let inventory = TheoreticalInventory::from_rows(&self.rows, name)?;
            if inventory.is_empty() {
                return Err(DomainError::validation(format!(
                    "warehouse '{name}' has no stock rows"
                )));
            }

            let session = AuditSession::open(SessionId::new(), inventory, Utc::now());
            tracing::info!(
                warehouse = name,
                session_id = %session.id(),
                keys = session.engine().inventory().len(),
                "warehouse selected"
            );
            self.session = Some(session);
            self.journal.clear();
        }

        self.active_session()
    }

    /// The current session, or a validation error when no warehouse has been
    /// selected yet.
    pub fn active_session(&self) -> DomainResult<&AuditSession> {
        self.session
            .as_ref()
            .ok_or_else(|| DomainError::validation("no warehouse selected"))
    }

    /// Append one scan to the session and decompose it for feedback.
    ///
    /// Unmatched scans are still recorded; only blank input is rejected.
    pub fn submit_scan(&mut self, code: &str) -> DomainResult<ScanFeedback> {
        let session_id = *self.active_session()?.id();
        let command = SessionCommand::RecordScan(RecordScan {
            session_id,
            code: code.to_string(),
            occurred_at: Utc::now(),
        });
        if let Err(err) = self.execute(command) {
            tracing::warn!(error = %err, "scan rejected");
            return Err(err);
        }

        let session = self.active_session()?;
        let recorded = session
            .scans()
            .last()
            .ok_or_else(|| DomainError::invariant("recorded scan missing from session log"))?;
        let decomposition = session.engine().decompose(&recorded.code);

        tracing::debug!(
            sequence = recorded.sequence,
            code = %recorded.code,
            matched = decomposition.is_match(),
            "scan recorded"
        );
        Ok(ScanFeedback {
            sequence: recorded.sequence,
            code: recorded.code.clone(),
            decomposition,
        })
    }

    /// Clear the scan sequence of the active session. Returns how many scans
    /// were discarded.
    pub fn reset(&mut self) -> DomainResult<usize> {
        let session = self.active_session()?;
        let session_id = *session.id();
        let cleared = session.scans().len();

        self.execute(SessionCommand::ClearScans(ClearScans {
            session_id,
            occurred_at: Utc::now(),
        }))?;

        tracing::info!(%session_id, cleared, "scans reset");
        Ok(cleared)
    }

    /// Attach (or, with blank text, remove) the observation note of a pass.
    pub fn note_observation(&mut self, pass: AuditPass, text: &str) -> DomainResult<()> {
        let session_id = *self.active_session()?.id();
        self.execute(SessionCommand::NoteObservation(NoteObservation {
            session_id,
            pass,
            text: text.to_string(),
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    /// Reconcile the current scan sequence.
    pub fn report(&self) -> DomainResult<AuditReport> {
        let report = self.active_session()?.report(Utc::now());
        tracing::info!(
            warehouse = %report.warehouse,
            scans = report.scan_count,
            record_accuracy = report.records.summary.accuracy_percent,
            location_accuracy = report.locations.summary.accuracy_percent,
            "audit report generated"
        );
        Ok(report)
    }

    fn execute(&mut self, command: SessionCommand) -> DomainResult<usize> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| DomainError::validation("no warehouse selected"))?;

        let events = session.handle(&command)?;
        let emitted = events.len();
        for event in events {
            session.apply(&event);
            let sequence_number = self.journal.len() as u64 + 1;
            tracing::trace!(event = %event.schema(), sequence_number, "session event applied");
            self.journal
                .push(EventEnvelope::new(*session.id(), sequence_number, event));
        }
        Ok(emitted)
    }
}
