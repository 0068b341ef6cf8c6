//! Configuration parsing for the live-board update bus.
//!
//! All settings come from a single JSON config file. Optional fields fall
//! back to the defaults the original deployment used (3 s reconnect delay,
//! 6 s probe interval).
//!
//! # Example config
//!
//! ```json
//! {
//!   "base_url": "http://127.0.0.1:8000",
//!   "probe_url": "http://127.0.0.1:8000/ping",
//!   "reconnect_delay_ms": 3000,
//!   "probe_interval_ms": 6000
//! }
//! ```

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

/// Bus configuration, deserialized from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct BusConfig {
    /// Base URL of the serving backend (e.g. `http://127.0.0.1:8000`).
    /// The bootstrap resource lives at `{base_url}/api/bootstrap` and the
    /// event stream at `{base_url}/sse/updates`.
    pub base_url: String,

    /// Health probe URL for the downstream trading gateway.
    /// Defaults to `{base_url}/ping`.
    pub probe_url: Option<String>,

    /// Delay before re-opening a terminated event stream (default: 3000).
    pub reconnect_delay_ms: Option<u64>,

    /// Interval between gateway health probes (default: 6000).
    pub probe_interval_ms: Option<u64>,

    /// Timeout for one-shot requests — bootstrap and probe (default: 5000).
    /// The stream request carries no timeout; its body is unbounded.
    pub request_timeout_ms: Option<u64>,

    /// Capacity of the event notification channel (default: 64).
    pub event_buffer: Option<usize>,
}

impl BusConfig {
    /// Minimal config from a base URL, everything else defaulted.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            probe_url: None,
            reconnect_delay_ms: None,
            probe_interval_ms: None,
            request_timeout_ms: None,
            event_buffer: None,
        }
    }

    /// Full URL of the bootstrap snapshot resource.
    pub fn bootstrap_url(&self) -> String {
        format!("{}/api/bootstrap", self.base_url.trim_end_matches('/'))
    }

    /// Full URL of the server-push event stream.
    pub fn stream_url(&self) -> String {
        format!("{}/sse/updates", self.base_url.trim_end_matches('/'))
    }

    /// Effective probe URL, defaulting to `{base_url}/ping`.
    pub fn effective_probe_url(&self) -> String {
        self.probe_url
            .clone()
            .unwrap_or_else(|| format!("{}/ping", self.base_url.trim_end_matches('/')))
    }

    /// Effective reconnect delay.
    pub fn effective_reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms.unwrap_or(3_000))
    }

    /// Effective probe interval.
    pub fn effective_probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms.unwrap_or(6_000))
    }

    /// Effective one-shot request timeout.
    pub fn effective_request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.unwrap_or(5_000))
    }

    /// Effective notification channel capacity. Clamped to at least 1 —
    /// a zero-capacity broadcast channel is not constructible.
    pub fn effective_event_buffer(&self) -> usize {
        self.event_buffer.unwrap_or(64).max(1)
    }
}

/// Load and parse a JSON config file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<BusConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| crate::LbError::Config(format!("{}: {e}", path.display())))?;
    let config: BusConfig = serde_json::from_str(&content)
        .map_err(|e| crate::LbError::Config(format!("{}: {e}", path.display())))?;
    debug!("config loaded from {} (base_url={})", path.display(), config.base_url);
    Ok(config)
}
