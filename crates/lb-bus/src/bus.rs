//! The bus lifecycle object handed to the UI layer.
//!
//! [`UpdateBus`] replaces the original's lazily-started process-wide
//! singleton with an explicit context object: the application root
//! constructs it once, shares it by reference (or `Arc`), and disposes it
//! on shutdown. `ensure_started()` is idempotent via an internal started
//! flag; the instance is single-use — a disposed bus is not restartable.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use lb_core::LbError;
use lb_core::config::BusConfig;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::info;

use crate::event::{BusEvent, Snapshot};
use crate::state::StatePublisher;
use crate::{bootstrap, probe, tailer};

pub struct UpdateBus {
    cfg: BusConfig,
    client: reqwest::Client,
    state: Arc<StatePublisher>,
    started: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl UpdateBus {
    /// Build the bus. No I/O happens until [`ensure_started`](Self::ensure_started).
    pub fn new(cfg: BusConfig) -> anyhow::Result<Self> {
        // No client-wide timeout: it would also cap the unbounded stream
        // body. Bootstrap and probe set per-request timeouts instead.
        let client = reqwest::Client::builder().build()?;
        let state = Arc::new(StatePublisher::new(cfg.effective_event_buffer()));
        Ok(Self {
            cfg,
            client,
            state,
            started: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Start the bus tasks: one-shot bootstrap, stream tailer, liveness
    /// prober. Idempotent — every call after the first is a no-op. Must be
    /// called from within a tokio runtime.
    pub fn ensure_started(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut tasks = self.tasks.lock().expect("task list lock poisoned");
        tasks.push(tokio::spawn(bootstrap::run(
            self.client.clone(),
            self.cfg.clone(),
            Arc::clone(&self.state),
        )));
        tasks.push(tokio::spawn(tailer::run(
            self.client.clone(),
            self.cfg.clone(),
            Arc::clone(&self.state),
        )));
        tasks.push(tokio::spawn(probe::run(
            self.client.clone(),
            self.cfg.clone(),
            Arc::clone(&self.state),
        )));
        info!("update bus started ({})", self.cfg.base_url);
    }

    /// Tear the bus down: cancel the stream subscription (releasing the
    /// connection and any pending reconnect sleep), cancel the probe timer,
    /// then close the notification channel. Safe to call more than once.
    pub async fn dispose(&self) {
        let tasks: Vec<JoinHandle<()>> = {
            let mut guard = self.tasks.lock().expect("task list lock poisoned");
            guard.drain(..).collect()
        };
        for task in &tasks {
            task.abort();
        }
        for task in tasks {
            let _ = task.await;
        }
        self.state.close();
        info!("update bus disposed");
    }

    // -- published surface --------------------------------------------------

    /// Subscribe to the event notification channel (no replay of past
    /// events). Fails after `dispose()`.
    pub fn subscribe(&self) -> Result<broadcast::Receiver<BusEvent>, LbError> {
        self.state.subscribe()
    }

    /// Current connectivity verdict.
    pub fn connected(&self) -> bool {
        self.state.connected()
    }

    /// Observe connectivity transitions (change-only).
    pub fn watch_connected(&self) -> watch::Receiver<bool> {
        self.state.watch_connected()
    }

    /// Last-known snapshot (empty until the first accepted snapshot).
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Observe snapshot replacements (change-only).
    pub fn watch_snapshot(&self) -> watch::Receiver<Snapshot> {
        self.state.watch_snapshot()
    }

    /// Milliseconds-since-epoch of the last accepted update (0 = never).
    pub fn last_update_ms(&self) -> u64 {
        self.state.last_update_ms()
    }

    /// Observe timestamp updates (change-only).
    pub fn watch_last_update(&self) -> watch::Receiver<u64> {
        self.state.watch_last_update()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_started_is_idempotent() {
        let bus = UpdateBus::new(BusConfig::for_base_url("http://127.0.0.1:9")).unwrap();
        bus.ensure_started();
        bus.ensure_started();
        bus.ensure_started();
        assert_eq!(bus.tasks.lock().unwrap().len(), 3);
        bus.dispose().await;
    }

    #[tokio::test]
    async fn zero_event_buffer_does_not_panic() {
        let mut cfg = BusConfig::for_base_url("http://127.0.0.1:9");
        cfg.event_buffer = Some(0);
        let bus = UpdateBus::new(cfg).unwrap();
        assert!(bus.subscribe().is_ok());
        bus.dispose().await;
    }

    #[tokio::test]
    async fn dispose_is_terminal() {
        let bus = UpdateBus::new(BusConfig::for_base_url("http://127.0.0.1:9")).unwrap();
        bus.ensure_started();
        bus.dispose().await;
        bus.dispose().await;

        assert!(matches!(bus.subscribe(), Err(LbError::ChannelClosed)));
        // The started flag stays set: no tasks come back after dispose.
        bus.ensure_started();
        assert!(bus.tasks.lock().unwrap().is_empty());
    }
}
