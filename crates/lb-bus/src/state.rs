//! Published state shared by all bus tasks and observed by the UI layer.
//!
//! [`StatePublisher`] holds the last-known snapshot, the connectivity flag,
//! and the last-update timestamp behind `tokio::sync::watch` channels, and
//! fans events out on a `tokio::sync::broadcast` channel. Watch updates use
//! `send_if_modified`, so writing a value identical to the current one never
//! notifies — repeated heartbeats cannot cause notification storms.
//!
//! The broadcast channel has no history: late subscribers only see future
//! events. `close()` drops the sender; publishing afterwards is an error,
//! not a silent leak.

use std::sync::Mutex;

use lb_core::{LbError, time_util};
use tokio::sync::{broadcast, watch};
use tracing::error;

use crate::event::{BusEvent, Snapshot};

pub struct StatePublisher {
    // Taken (set to None) by `close()`.
    events: Mutex<Option<broadcast::Sender<BusEvent>>>,
    connected: watch::Sender<bool>,
    snapshot: watch::Sender<Snapshot>,
    last_update: watch::Sender<u64>,
}

impl StatePublisher {
    /// Create a publisher whose event channel buffers `event_buffer`
    /// notifications per subscriber before lagging.
    pub fn new(event_buffer: usize) -> Self {
        let (events, _) = broadcast::channel(event_buffer);
        Self {
            events: Mutex::new(Some(events)),
            connected: watch::Sender::new(false),
            snapshot: watch::Sender::new(Snapshot::new()),
            last_update: watch::Sender::new(0),
        }
    }

    // -- notification channel -----------------------------------------------

    /// Subscribe to future events. Fails once the publisher is closed.
    pub fn subscribe(&self) -> Result<broadcast::Receiver<BusEvent>, LbError> {
        match self.events.lock().expect("events lock poisoned").as_ref() {
            Some(tx) => Ok(tx.subscribe()),
            None => Err(LbError::ChannelClosed),
        }
    }

    /// Deliver an event to all current subscribers.
    ///
    /// Zero subscribers is normal (the UI may not have attached yet);
    /// publishing after `close()` is not.
    pub fn publish(&self, event: BusEvent) -> Result<(), LbError> {
        match self.events.lock().expect("events lock poisoned").as_ref() {
            Some(tx) => {
                let _ = tx.send(event);
                Ok(())
            }
            None => {
                error!("event published after dispose: {event:?}");
                Err(LbError::ChannelClosed)
            }
        }
    }

    /// Close the notification channel. All receivers observe `Closed` once
    /// they drain; further publishes fail loudly.
    pub fn close(&self) {
        self.events.lock().expect("events lock poisoned").take();
    }

    // -- observable values --------------------------------------------------

    /// Current connectivity verdict.
    pub fn connected(&self) -> bool {
        *self.connected.borrow()
    }

    /// Watch connectivity changes. Notified only on actual transitions.
    pub fn watch_connected(&self) -> watch::Receiver<bool> {
        self.connected.subscribe()
    }

    /// Set the connectivity flag. Both the stream tailer and the liveness
    /// prober write here; last writer wins, no arbitration between them.
    pub fn set_connected(&self, up: bool) {
        self.connected.send_if_modified(|current| {
            if *current == up {
                false
            } else {
                *current = up;
                true
            }
        });
    }

    /// Current snapshot (empty map until the first accepted snapshot).
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    pub fn watch_snapshot(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    /// Milliseconds-since-epoch of the last accepted update (0 = never).
    pub fn last_update_ms(&self) -> u64 {
        *self.last_update.borrow()
    }

    pub fn watch_last_update(&self) -> watch::Receiver<u64> {
        self.last_update.subscribe()
    }

    // -- accepted updates ---------------------------------------------------

    /// Accept a full snapshot (bootstrap or streamed): replace the published
    /// snapshot wholesale, stamp, and notify subscribers. Observers never
    /// see a partially applied snapshot — the watch value swaps atomically.
    pub fn accept_snapshot(&self, snap: Snapshot) {
        self.snapshot.send_if_modified(|current| {
            if *current == snap {
                false
            } else {
                *current = snap.clone();
                true
            }
        });
        self.touch();
        let _ = self.publish(BusEvent::Snapshot(snap));
    }

    /// Accept a generic typed event: stamp and forward verbatim. The
    /// snapshot is left untouched.
    pub fn accept_generic(&self, kind: String, fields: Snapshot) {
        self.touch();
        let _ = self.publish(BusEvent::Generic { kind, fields });
    }

    fn touch(&self) {
        let now = time_util::now_ms();
        self.last_update.send_if_modified(|current| {
            if *current == now {
                false
            } else {
                *current = now;
                true
            }
        });
    }
}
