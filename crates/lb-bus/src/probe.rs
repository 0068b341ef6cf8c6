//! Periodic liveness probe of the downstream trading gateway.
//!
//! Runs on its own timer, independent of the stream tailer. The gateway's
//! `/ping` endpoint answers `{"connected": bool, ...}`; that boolean becomes
//! the connectivity verdict. Any probe failure (timeout, network error,
//! missing or non-boolean field) reads as offline.
//!
//! Both this prober and the tailer write the same flag; the last writer
//! wins and neither arbitrates with the other.

use std::sync::Arc;

use lb_core::config::BusConfig;
use serde_json::Value;
use tokio::time::{Instant, interval_at};
use tracing::debug;

use crate::state::StatePublisher;

/// Response field carrying the gateway's own connectivity verdict.
const CONNECTED_FIELD: &str = "connected";

/// Probe the gateway on a fixed interval until the task is aborted.
pub async fn run(client: reqwest::Client, cfg: BusConfig, state: Arc<StatePublisher>) {
    let url = cfg.effective_probe_url();
    let period = cfg.effective_probe_interval();
    let timeout = cfg.effective_request_timeout();

    // First probe fires one full period after start, not immediately.
    let mut timer = interval_at(Instant::now() + period, period);
    loop {
        timer.tick().await;
        let verdict = check(&client, &url, timeout).await.unwrap_or(false);
        debug!("gateway probe: connected={verdict}");
        state.set_connected(verdict);
    }
}

/// One probe round trip; `None` on any failure.
async fn check(
    client: &reqwest::Client,
    url: &str,
    timeout: std::time::Duration,
) -> Option<bool> {
    let resp = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?;
    let body: Value = resp.json().await.ok()?;
    body.get(CONNECTED_FIELD)?.as_bool()
}
