//! Per-side lifecycle tracking for endpoints.

use std::fmt;

use super::condition::Condition;
use super::state::State;
use crate::error::{AmqpError, Result};

/// Lifecycle of one side of an endpoint.
///
/// Each side only ever moves forward: `Uninit -> Active -> Closed`
/// (`Uninit -> Closed` is allowed as well).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lifecycle {
    /// Not yet opened
    #[default]
    Uninit,
    /// Opened
    Active,
    /// Closed (terminal)
    Closed,
}

/// Which side of an endpoint a lifecycle value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// This engine's side
    Local,
    /// The peer's side, as reported by incoming frames
    Remote,
}

impl Side {
    /// Get descriptive name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Lifecycle {
    /// State bit for this lifecycle value on the given side.
    pub fn bit(self, side: Side) -> State {
        match (side, self) {
            (Side::Local, Self::Uninit) => State::LOCAL_UNINIT,
            (Side::Local, Self::Active) => State::LOCAL_ACTIVE,
            (Side::Local, Self::Closed) => State::LOCAL_CLOSED,
            (Side::Remote, Self::Uninit) => State::REMOTE_UNINIT,
            (Side::Remote, Self::Active) => State::REMOTE_ACTIVE,
            (Side::Remote, Self::Closed) => State::REMOTE_CLOSED,
        }
    }
}

/// Local and remote lifecycle of a single endpoint, plus its error conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointState {
    local: Lifecycle,
    remote: Lifecycle,
    condition: Option<Condition>,
    remote_condition: Option<Condition>,
}

impl EndpointState {
    /// Create a fresh `LOCAL_UNINIT | REMOTE_UNINIT` endpoint state
    pub fn new() -> Self {
        Self::default()
    }

    /// Local lifecycle
    pub fn local(&self) -> Lifecycle {
        self.local
    }

    /// Remote lifecycle
    pub fn remote(&self) -> Lifecycle {
        self.remote
    }

    /// Actual combined state. Always has one local and one remote bit.
    pub fn state(&self) -> State {
        self.local.bit(Side::Local) | self.remote.bit(Side::Remote)
    }

    /// Local error condition, if closed with one
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Remote error condition, if the peer closed with one
    pub fn remote_condition(&self) -> Option<&Condition> {
        self.remote_condition.as_ref()
    }

    /// Move one side to `to`.
    ///
    /// Returns `Ok(true)` if the side changed and `Ok(false)` if it already
    /// held `to`. Moving backwards fails with [`AmqpError::InvalidTransition`];
    /// `describe` names the endpoint in that error.
    pub fn transition(
        &mut self,
        side: Side,
        to: Lifecycle,
        describe: impl FnOnce() -> String,
    ) -> Result<bool> {
        let current = match side {
            Side::Local => &mut self.local,
            Side::Remote => &mut self.remote,
        };

        if *current == to {
            return Ok(false);
        }
        if *current > to {
            let endpoint = describe();
            tracing::warn!("Rejected {side} transition on {endpoint}: {current:?} -> {to:?}");
            return Err(AmqpError::InvalidTransition {
                endpoint,
                side,
                from: *current,
                to,
            });
        }

        *current = to;
        Ok(true)
    }

    /// Close one side, recording an optional error condition for it.
    pub fn close(
        &mut self,
        side: Side,
        condition: Option<Condition>,
        describe: impl FnOnce() -> String,
    ) -> Result<bool> {
        let changed = self.transition(side, Lifecycle::Closed, describe)?;
        if changed && condition.is_some() {
            match side {
                Side::Local => self.condition = condition,
                Side::Remote => self.remote_condition = condition,
            }
        }
        Ok(changed)
    }
}
