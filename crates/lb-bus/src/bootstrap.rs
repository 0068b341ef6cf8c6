//! One-shot bootstrap snapshot fetch — the instant-first-paint fast path.
//!
//! Best effort only: any failure (network, non-200, malformed body) is
//! swallowed and the existing state left untouched. The stream tailer is
//! expected to eventually deliver a snapshot, so there is no retry here.

use std::sync::Arc;

use lb_core::config::BusConfig;
use reqwest::{StatusCode, header};
use serde_json::Value;
use tracing::{debug, info};

use crate::state::StatePublisher;

/// Fetch `{base}/api/bootstrap` once and publish the snapshot on success.
pub async fn run(client: reqwest::Client, cfg: BusConfig, state: Arc<StatePublisher>) {
    let url = cfg.bootstrap_url();

    let resp = match client
        .get(&url)
        .header(header::ACCEPT, "application/json")
        .timeout(cfg.effective_request_timeout())
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            debug!("bootstrap fetch failed: {e}");
            return;
        }
    };

    // 304 (and any other non-200) is a valid no-op, not an error.
    if resp.status() != StatusCode::OK {
        debug!("bootstrap skipped (status {})", resp.status());
        return;
    }

    match resp.json::<Value>().await {
        Ok(Value::Object(snap)) => {
            info!("bootstrap snapshot applied ({} keys)", snap.len());
            state.accept_snapshot(snap);
        }
        Ok(other) => debug!("bootstrap body is not an object: {other}"),
        Err(e) => debug!("bootstrap body unreadable: {e}"),
    }
}
