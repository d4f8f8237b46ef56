//! Sender/receiver link endpoints.

use std::fmt;

use crate::endpoint::{Condition, Endpoint, EndpointState, Lifecycle, Side, State};
use crate::error::Result;

/// Link role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Sends messages to the peer
    Sender,
    /// Receives messages from the peer
    Receiver,
}

impl Role {
    /// Get descriptive name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sender => "sender",
            Self::Receiver => "receiver",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A link endpoint, owned by a [`Session`](super::Session)
#[derive(Debug)]
pub struct Link {
    /// Link name, unique within the session
    name: String,
    /// Handle number assigned at attach
    handle: u32,
    /// Sender or receiver
    role: Role,
    /// Local/remote lifecycle
    endpoint: EndpointState,
}

impl Link {
    pub(crate) fn new(name: String, handle: u32, role: Role) -> Self {
        Self {
            name,
            handle,
            role,
            endpoint: EndpointState::new(),
        }
    }

    /// Get link name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get handle number
    pub fn handle(&self) -> u32 {
        self.handle
    }

    /// Get role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Check if this is a sending link
    pub fn is_sender(&self) -> bool {
        self.role == Role::Sender
    }

    /// Check if this is a receiving link
    pub fn is_receiver(&self) -> bool {
        self.role == Role::Receiver
    }

    /// Open the local side (ATTACH sent)
    pub fn attach(&mut self) -> Result<()> {
        self.set(Side::Local, Lifecycle::Active, None)
    }

    /// Close the local side (DETACH sent)
    pub fn detach(&mut self) -> Result<()> {
        self.set(Side::Local, Lifecycle::Closed, None)
    }

    /// Close the local side with an error condition
    pub fn detach_with(&mut self, condition: Condition) -> Result<()> {
        self.set(Side::Local, Lifecycle::Closed, Some(condition))
    }

    /// Record that the peer attached
    pub fn remote_attach(&mut self) -> Result<()> {
        self.set(Side::Remote, Lifecycle::Active, None)
    }

    /// Record that the peer detached, optionally with an error condition
    pub fn remote_detach(&mut self, condition: Option<Condition>) -> Result<()> {
        self.set(Side::Remote, Lifecycle::Closed, condition)
    }

    fn set(&mut self, side: Side, to: Lifecycle, condition: Option<Condition>) -> Result<()> {
        let label = || format!("{} link '{}'", self.role, self.name);
        let changed = match to {
            Lifecycle::Closed => self.endpoint.close(side, condition, label)?,
            _ => self.endpoint.transition(side, to, label)?,
        };
        if changed {
            tracing::debug!(
                link = %self.name,
                handle = self.handle,
                state = %self.endpoint.state(),
                "Link {side} -> {to:?}"
            );
        }
        Ok(())
    }
}

impl Endpoint for Link {
    fn state(&self) -> State {
        self.endpoint.state()
    }

    fn condition(&self) -> Option<&Condition> {
        self.endpoint.condition()
    }

    fn remote_condition(&self) -> Option<&Condition> {
        self.endpoint.remote_condition()
    }
}
