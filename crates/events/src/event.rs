use chrono::{DateTime, Utc};

/// A fact recorded in an audit session's log.
///
/// Session events are never edited or removed; a reset is itself an event.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted event name, e.g. `"audit.scan.recorded"`.
    fn event_type(&self) -> &'static str;

    /// Payload schema version for this event type.
    fn version(&self) -> u32;

    /// Business time: when the operator acted, not when the event was stored.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// `event_type@vN`, as written to logs.
    fn schema(&self) -> String {
        format!("{}@v{}", self.event_type(), self.version())
    }
}
