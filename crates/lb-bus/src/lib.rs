//! # lb-bus
//!
//! The live-board update bus: fetches a bootstrap snapshot, tails the
//! server-push event stream, probes the trading gateway's health, and
//! publishes current state to any number of UI-layer observers.
//!
//! ## Architecture
//!
//! [`UpdateBus`] is the context object owned by the application root. Its
//! `ensure_started()` spawns three tasks sharing one [`StatePublisher`]:
//!
//! ```text
//! bootstrap (one-shot GET)  ──►  StatePublisher  ◄──  tailer (SSE loop,
//! probe (interval GET)      ──►  (snapshot, flag,     fixed-delay reconnect)
//!                                 timestamp, events)
//! ```
//!
//! Observers subscribe to the broadcast event channel (no replay) and to
//! watch channels for connectivity, snapshot, and last-update timestamp
//! (change-only notification). No error ever propagates to observers;
//! every failure shows up as the flag going offline or as absence of
//! updates.

pub mod bootstrap;
pub mod bus;
pub mod event;
pub mod probe;
pub mod state;
pub mod tailer;

pub use bus::UpdateBus;
pub use event::{BusEvent, Snapshot};
pub use state::StatePublisher;
