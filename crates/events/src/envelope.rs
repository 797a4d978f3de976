use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockaudit_core::SessionId;

/// Envelope for an event, carrying the session stream metadata.
///
/// `sequence_number` is monotonically increasing per session stream and
/// starts at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    session_id: SessionId,
    sequence_number: u64,
    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(session_id: SessionId, sequence_number: u64, payload: E) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            session_id,
            sequence_number,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Event;
    use chrono::{DateTime, TimeZone, Utc};

    #[derive(Debug, Clone, PartialEq)]
    struct Marked(DateTime<Utc>);

    impl Event for Marked {
        fn event_type(&self) -> &'static str {
            "test.marked"
        }

        fn version(&self) -> u32 {
            2
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn envelope_carries_stream_metadata() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let session = SessionId::new();
        let first = EventEnvelope::new(session, 1, Marked(at));
        let second = EventEnvelope::new(session, 2, Marked(at));

        assert_eq!(first.session_id(), session);
        assert_eq!(second.sequence_number(), 2);
        assert_ne!(first.event_id(), second.event_id());
        assert_eq!(first.payload().schema(), "test.marked@v2");
        assert_eq!(second.into_payload(), Marked(at));
    }
}
