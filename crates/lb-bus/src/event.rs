//! Event types published by the bus to downstream consumers (the UI layer).
//!
//! Each inbound stream record is classified by its `event:` type. The
//! payload is opaque to the bus — a JSON object passed through without
//! semantic interpretation of its keys.

use lb_core::sse::SseRecord;
use serde_json::Value;

/// Full current application state (positions, orders, PnL, ...). Opaque to
/// the bus; replaced wholesale on every full update, never merged.
pub type Snapshot = serde_json::Map<String, Value>;

/// Stream event type that marks a keepalive record.
pub const HEARTBEAT_EVENT: &str = "hb";

/// Stream event type that carries a full state snapshot.
pub const SNAPSHOT_EVENT: &str = "snapshot";

/// A classified event from the stream (or the bootstrap fast path).
#[derive(Debug, Clone, PartialEq)]
pub enum BusEvent {
    /// Keepalive — no payload, no state change, never forwarded to
    /// observers. Only confirms the stream is alive.
    Heartbeat,

    /// Full state replacement.
    Snapshot(Snapshot),

    /// Any other typed event, forwarded verbatim to observers without
    /// touching the snapshot.
    Generic {
        /// The record's `event:` type (e.g. `"positions"`).
        kind: String,
        /// The record's payload object.
        fields: Snapshot,
    },
}

/// Classify one decoded stream record.
///
/// Returns `None` for a malformed payload (non-JSON or non-object data on a
/// non-heartbeat record); the caller drops the record and keeps tailing.
pub fn classify(record: &SseRecord) -> Option<BusEvent> {
    if record.event == HEARTBEAT_EVENT {
        return Some(BusEvent::Heartbeat);
    }
    let fields = match serde_json::from_str::<Value>(&record.data) {
        Ok(Value::Object(map)) => map,
        _ => return None,
    };
    if record.event == SNAPSHOT_EVENT {
        Some(BusEvent::Snapshot(fields))
    } else {
        Some(BusEvent::Generic { kind: record.event.clone(), fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(event: &str, data: &str) -> SseRecord {
        SseRecord { event: event.into(), data: data.into() }
    }

    #[test]
    fn heartbeat_ignores_payload() {
        assert_eq!(classify(&record("hb", "")), Some(BusEvent::Heartbeat));
        // Even junk data on a heartbeat is fine — there is nothing to parse.
        assert_eq!(classify(&record("hb", "garbage")), Some(BusEvent::Heartbeat));
    }

    #[test]
    fn snapshot_event() {
        let ev = classify(&record("snapshot", r#"{"pnl": 150}"#)).unwrap();
        match ev {
            BusEvent::Snapshot(snap) => assert_eq!(snap["pnl"], 150),
            other => panic!("expected Snapshot, got {other:?}"),
        }
    }

    #[test]
    fn generic_event_keeps_kind_and_fields() {
        let ev = classify(&record("positions", r#"{"AAPL": 10}"#)).unwrap();
        match ev {
            BusEvent::Generic { kind, fields } => {
                assert_eq!(kind, "positions");
                assert_eq!(fields["AAPL"], 10);
            }
            other => panic!("expected Generic, got {other:?}"),
        }
    }

    #[test]
    fn malformed_payload_dropped() {
        assert_eq!(classify(&record("snapshot", "not json")), None);
        assert_eq!(classify(&record("positions", "[1,2,3]")), None);
        assert_eq!(classify(&record("positions", "")), None);
    }
}
