//! Typed error definitions for the live-board system.
//!
//! Provides [`LbError`] for domain-specific errors that are more informative
//! than plain `anyhow::Error` strings. All variants implement `std::error::Error`
//! via `thiserror`, so they integrate seamlessly with `anyhow::Result`.

use thiserror::Error;

/// Domain-specific errors for the live-board system.
#[derive(Debug, Error)]
pub enum LbError {
    /// Configuration reading or parsing error.
    #[error("config error: {0}")]
    Config(String),

    /// Event stream connection error.
    #[error("stream error: {0}")]
    Stream(String),

    /// The notification channel was closed by `dispose()`.
    #[error("notification channel closed")]
    ChannelClosed,
}
