//! Long-lived event stream tailer with fixed-delay reconnect.
//!
//! One task owns the whole stream lifecycle:
//!
//! 1. Open `GET {base}/sse/updates` (`Accept: text/event-stream`).
//! 2. Decode the byte stream incrementally and apply each record.
//! 3. On read error or peer close: mark offline, sleep the reconnect
//!    delay, go to 1. Connect failures take the same path.
//!
//! Retries are unbounded with a constant delay. The single sleep between
//! attempts is the only pending reconnect timer that can exist, however
//! many terminal signals fire.

use std::sync::Arc;

use futures_util::StreamExt;
use lb_core::LbError;
use lb_core::config::BusConfig;
use lb_core::sse::{SseDecoder, SseRecord};
use reqwest::header;
use tracing::{debug, info, warn};

use crate::event::{self, BusEvent};
use crate::state::StatePublisher;

/// Tail the event stream until the task is aborted.
pub async fn run(client: reqwest::Client, cfg: BusConfig, state: Arc<StatePublisher>) {
    let url = cfg.stream_url();
    let delay = cfg.effective_reconnect_delay();

    loop {
        debug!("opening event stream {url}");
        match open(&client, &url).await {
            Ok(resp) => {
                info!("event stream connected");
                tail(resp, &state).await;
            }
            Err(e) => warn!("event stream connect failed: {e}"),
        }

        state.set_connected(false);
        debug!("reconnecting in {delay:?}");
        tokio::time::sleep(delay).await;
    }
}

async fn open(client: &reqwest::Client, url: &str) -> Result<reqwest::Response, LbError> {
    // No timeout: the response body is an unbounded push stream.
    let resp = client
        .get(url)
        .header(header::ACCEPT, "text/event-stream")
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| LbError::Stream(e.to_string()))?;
    Ok(resp)
}

/// Read the response body until error or peer close.
async fn tail(resp: reqwest::Response, state: &StatePublisher) {
    let mut decoder = SseDecoder::new();
    let mut body = resp.bytes_stream();

    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(bytes) => {
                for record in decoder.push(&bytes) {
                    apply_record(state, record);
                }
            }
            Err(e) => {
                warn!("event stream read error: {e}");
                return;
            }
        }
    }
    warn!("event stream closed by peer");
}

/// Apply one decoded record to the published state.
///
/// Any inbound record at all is a connectivity signal to the serving
/// backend, whatever the liveness prober thinks of the gateway. A record
/// that fails to classify is dropped without terminating the subscription.
pub(crate) fn apply_record(state: &StatePublisher, record: SseRecord) {
    state.set_connected(true);

    match event::classify(&record) {
        Some(BusEvent::Heartbeat) => {}
        Some(BusEvent::Snapshot(snap)) => state.accept_snapshot(snap),
        Some(BusEvent::Generic { kind, fields }) => state.accept_generic(kind, fields),
        None => warn!("dropping malformed '{}' record", record.event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Snapshot;
    use serde_json::json;

    fn record(event: &str, data: &str) -> SseRecord {
        SseRecord { event: event.into(), data: data.into() }
    }

    fn snap(v: serde_json::Value) -> Snapshot {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn last_snapshot_wins() {
        let state = StatePublisher::new(16);
        apply_record(&state, record("snapshot", r#"{"pnl": 100}"#));
        apply_record(&state, record("positions", r#"{"AAPL": 10}"#));
        apply_record(&state, record("snapshot", r#"{"pnl": 150}"#));
        assert_eq!(state.snapshot(), snap(json!({"pnl": 150})));
        assert!(state.connected());
    }

    #[test]
    fn heartbeat_marks_online_only() {
        let state = StatePublisher::new(16);
        let mut events = state.subscribe().unwrap();

        apply_record(&state, record("hb", ""));
        assert!(state.connected());
        assert_eq!(state.last_update_ms(), 0);
        assert!(state.snapshot().is_empty());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn malformed_record_dropped_stream_continues() {
        let state = StatePublisher::new(16);
        apply_record(&state, record("snapshot", r#"{"pnl": 100}"#));
        apply_record(&state, record("snapshot", "{{{"));
        // The bad record changed nothing; the next valid one still applies.
        assert_eq!(state.snapshot(), snap(json!({"pnl": 100})));
        apply_record(&state, record("snapshot", r#"{"pnl": 200}"#));
        assert_eq!(state.snapshot(), snap(json!({"pnl": 200})));
    }

    #[test]
    fn any_record_flips_offline_to_online() {
        let state = StatePublisher::new(16);
        state.set_connected(false);
        apply_record(&state, record("positions", r#"{"AAPL": 10}"#));
        assert!(state.connected());
    }

    #[test]
    fn generic_record_forwarded_with_kind() {
        let state = StatePublisher::new(16);
        let mut events = state.subscribe().unwrap();

        apply_record(&state, record("positions", r#"{"AAPL": 10}"#));
        match events.try_recv().unwrap() {
            BusEvent::Generic { kind, fields } => {
                assert_eq!(kind, "positions");
                assert_eq!(fields, snap(json!({"AAPL": 10})));
            }
            other => panic!("expected Generic, got {other:?}"),
        }
        assert!(state.last_update_ms() > 0);
    }
}
