//! Session events: the append-only log behind an audit session.

pub mod envelope;
pub mod event;

pub use envelope::EventEnvelope;
pub use event::Event;
