//! Audit sessions: the scan log of one warehouse selection and the reports
//! built from it.
//!
//! - [`AuditSession`] is an event-sourced aggregate owning the append-only
//!   scan sequence and the operator's observations.
//! - [`AuditDesk`] is the single owner of the current session. Selecting a
//!   different warehouse discards the session and rebuilds every lookup
//!   structure from the stock listing.
//! - [`AuditReport`] is what reporting consumes: both reconciliation passes,
//!   their summaries and chart breakdowns.

pub mod desk;
pub mod report;
pub mod session;

pub use desk::AuditDesk;
pub use report::{AuditReport, PassReport};
pub use session::{
    AuditPass, AuditSession, ClearScans, NoteObservation, ObservationNoted, RecordScan, RecordedScan,
    ScanFeedback, ScanRecorded, ScansCleared, SessionCommand, SessionEvent,
};
