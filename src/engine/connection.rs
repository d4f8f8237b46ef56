//! Connection endpoints.
//!
//! The connection is the root of the endpoint hierarchy: it exclusively owns
//! its sessions (creation order), which in turn own their links.

use super::session::Session;
use crate::config::ConnectionConfig;
use crate::endpoint::{Condition, Endpoint, EndpointState, Lifecycle, Side, State};
use crate::error::{AmqpError, Result};
use crate::iter::{LinkCursor, LinkIter, LinkRange, SessionCursor, SessionIter, SessionRange};

/// An AMQP connection endpoint
#[derive(Debug)]
pub struct Connection {
    /// Container id announced in OPEN
    container_id: String,
    /// Connection settings
    config: ConnectionConfig,
    /// Local/remote lifecycle
    endpoint: EndpointState,
    /// Sessions in creation order
    sessions: Vec<Session>,
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection {
    /// Create a connection with default settings and a generated container id
    pub fn new() -> Self {
        Self::with_config(ConnectionConfig::default())
    }

    /// Create a connection from configuration
    pub fn with_config(config: ConnectionConfig) -> Self {
        let container_id = config
            .container_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        tracing::debug!(%container_id, channel_max = config.channel_max, "Connection created");

        Self {
            container_id,
            config,
            endpoint: EndpointState::new(),
            sessions: Vec::new(),
        }
    }

    /// Get container id
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Get virtual host name
    pub fn hostname(&self) -> Option<&str> {
        self.config.hostname.as_deref()
    }

    /// Get connection settings
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Number of sessions owned by this connection
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of links across all sessions
    pub fn link_count(&self) -> usize {
        self.sessions.iter().map(Session::link_count).sum()
    }

    /// Find a session by channel
    pub fn session(&self, channel: u16) -> Option<&Session> {
        self.sessions.iter().find(|s| s.channel() == channel)
    }

    /// Find a session by channel, mutably
    pub fn session_mut(&mut self, channel: u16) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.channel() == channel)
    }

    /// Create a new session on the lowest free channel.
    pub fn begin_session(&mut self) -> Result<&mut Session> {
        let channel_max = self.config.channel_max;
        let channel = (0..=channel_max)
            .find(|c| self.sessions.iter().all(|s| s.channel() != *c))
            .ok_or_else(|| {
                tracing::warn!(container_id = %self.container_id, "No free channel");
                AmqpError::ChannelMaxExceeded(channel_max)
            })?;

        tracing::debug!(channel, "Session created");
        self.sessions
            .push(Session::new(channel, self.config.handle_max));
        let index = self.sessions.len() - 1;
        Ok(&mut self.sessions[index])
    }

    /// Remove a session (and all its links) from the connection
    pub fn remove_session(&mut self, channel: u16) -> Option<Session> {
        let index = self.sessions.iter().position(|s| s.channel() == channel)?;
        let session = self.sessions.remove(index);
        tracing::debug!(channel, links = session.link_count(), "Session removed");
        Some(session)
    }

    /// Sessions whose state matches `mask`, in creation order
    pub fn sessions(&self, mask: State) -> SessionRange<'_> {
        SessionRange::new(
            SessionIter::new(SessionCursor::new(self), mask),
            SessionIter::end(),
        )
    }

    /// Links of every session whose state matches `mask`, in session order
    /// and then link order
    pub fn links(&self, mask: State) -> LinkRange<'_> {
        LinkRange::new(
            LinkIter::new(LinkCursor::connection(self), mask),
            LinkIter::end(),
        )
    }

    /// Open the local side (OPEN sent)
    pub fn open(&mut self) -> Result<()> {
        self.set(Side::Local, Lifecycle::Active, None)
    }

    /// Close the local side (CLOSE sent)
    pub fn close(&mut self) -> Result<()> {
        self.set(Side::Local, Lifecycle::Closed, None)
    }

    /// Close the local side with an error condition
    pub fn close_with(&mut self, condition: Condition) -> Result<()> {
        self.set(Side::Local, Lifecycle::Closed, Some(condition))
    }

    /// Record that the peer opened the connection
    pub fn remote_open(&mut self) -> Result<()> {
        self.set(Side::Remote, Lifecycle::Active, None)
    }

    /// Record that the peer closed the connection, optionally with an error
    pub fn remote_close(&mut self, condition: Option<Condition>) -> Result<()> {
        self.set(Side::Remote, Lifecycle::Closed, condition)
    }

    pub(crate) fn session_slice(&self) -> &[Session] {
        &self.sessions
    }

    fn set(&mut self, side: Side, to: Lifecycle, condition: Option<Condition>) -> Result<()> {
        let label = || format!("connection '{}'", self.container_id);
        let changed = match to {
            Lifecycle::Closed => self.endpoint.close(side, condition, label)?,
            _ => self.endpoint.transition(side, to, label)?,
        };
        if changed {
            tracing::debug!(
                container_id = %self.container_id,
                state = %self.endpoint.state(),
                "Connection {side} -> {to:?}"
            );
        }
        Ok(())
    }
}

impl Endpoint for Connection {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::symbols;
    use crate::engine::Role;

    #[test]
    fn test_container_id_from_config() {
        let conn = Connection::with_config(ConnectionConfig::default().with_container_id("c1"));
        assert_eq!(conn.container_id(), "c1");
        assert!(conn.hostname().is_none());
    }

    #[test]
    fn test_generated_container_ids_differ() {
        let a = Connection::new();
        let b = Connection::new();
        assert!(!a.container_id().is_empty());
        assert_ne!(a.container_id(), b.container_id());
    }

    #[test]
    fn test_begin_session_assigns_lowest_free_channel() {
        let mut conn = Connection::new();
        for expected in 0..3 {
            assert_eq!(conn.begin_session().unwrap().channel(), expected);
        }
        conn.remove_session(1).unwrap();
        assert_eq!(conn.begin_session().unwrap().channel(), 1);

        let order: Vec<u16> = conn.session_slice().iter().map(Session::channel).collect();
        assert_eq!(order, vec![0, 2, 1]);
    }

    #[test]
    fn test_channel_max_exceeded() {
        let mut conn = Connection::with_config(ConnectionConfig::default().with_channel_max(1));
        conn.begin_session().unwrap();
        conn.begin_session().unwrap();
        let err = conn.begin_session().unwrap_err();
        assert!(matches!(err, AmqpError::ChannelMaxExceeded(1)));
        assert_eq!(conn.session_count(), 2);
    }

    #[test]
    fn test_handle_max_propagates_to_sessions() {
        let mut conn = Connection::with_config(ConnectionConfig::default().with_handle_max(0));
        let session = conn.begin_session().unwrap();
        session.attach_link("a", Role::Sender).unwrap();
        assert!(matches!(
            session.attach_link("b", Role::Sender),
            Err(AmqpError::HandleMaxExceeded(0))
        ));
    }

    #[test]
    fn test_remove_session_drops_links() {
        let mut conn = Connection::new();
        let session = conn.begin_session().unwrap();
        session.attach_link("a", Role::Sender).unwrap();
        session.attach_link("b", Role::Receiver).unwrap();
        assert_eq!(conn.link_count(), 2);

        let removed = conn.remove_session(0).unwrap();
        assert_eq!(removed.link_count(), 2);
        assert_eq!(conn.link_count(), 0);
        assert!(conn.remove_session(0).is_none());
    }

    #[test]
    fn test_connection_lifecycle() {
        let mut conn = Connection::new();
        conn.open().unwrap();
        conn.remote_open().unwrap();
        assert_eq!(conn.state(), State::LOCAL_ACTIVE | State::REMOTE_ACTIVE);

        conn.remote_close(Some(Condition::new(symbols::CONNECTION_FORCED, "shutdown")))
            .unwrap();
        conn.close().unwrap();
        assert_eq!(conn.state(), State::LOCAL_CLOSED | State::REMOTE_CLOSED);
        assert!(conn.condition().is_none());
        assert_eq!(
            conn.remote_condition().map(ToString::to_string),
            Some("amqp:connection:forced: shutdown".to_string())
        );
        assert!(conn.open().is_err());
    }
}
