//! AMQP endpoint error types.
//!
//! Errors raised here are programmer or configuration errors: dereferencing an
//! exhausted iterator, moving an endpoint backwards through its lifecycle, or
//! running out of channel/handle numbers. None of them are transient, so there
//! is no retry classification.

use thiserror::Error;

use crate::endpoint::{Lifecycle, Side};

/// AMQP endpoint errors.
#[derive(Error, Debug)]
pub enum AmqpError {
    /// Operation is not valid in the current state (e.g. dereferencing an
    /// iterator positioned at its end).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// An endpoint side was asked to move backwards through its lifecycle.
    #[error("Invalid {side} transition on {endpoint}: {from:?} -> {to:?}")]
    InvalidTransition {
        /// Endpoint description (e.g. `session 3`).
        endpoint: String,
        /// Side of the endpoint being changed.
        side: Side,
        /// Current lifecycle value.
        from: Lifecycle,
        /// Requested lifecycle value.
        to: Lifecycle,
    },

    /// No free channel number is left on the connection.
    #[error("Channel max exceeded: all {0} channels in use")]
    ChannelMaxExceeded(u16),

    /// No free handle number is left on the session.
    #[error("Handle max exceeded: all {0} handles in use")]
    HandleMaxExceeded(u32),

    /// A link with the same name is already attached to the session.
    #[error("Duplicate link name: {0}")]
    DuplicateLink(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for AMQP endpoint operations
pub type Result<T> = std::result::Result<T, AmqpError>;

impl From<toml::de::Error> for AmqpError {
    fn from(err: toml::de::Error) -> Self {
        AmqpError::Config(err.to_string())
    }
}
