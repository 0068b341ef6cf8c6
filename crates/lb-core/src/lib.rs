//! # lb-core
//!
//! Core crate for the live-board update bus, providing:
//!
//! - **Configuration** (`config`) — JSON config deserialization
//! - **Error types** (`error`) — domain-specific `LbError` via thiserror
//! - **Logging** (`logging`) — tracing-based structured logging
//! - **SSE decoding** (`sse`) — incremental text/event-stream record decoder
//! - **Time utilities** (`time_util`) — epoch-millisecond timestamps

pub mod config;
pub mod error;
pub mod logging;
pub mod sse;
pub mod time_util;

pub use error::LbError;
