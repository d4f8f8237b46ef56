//! Session endpoints.
//!
//! A session is a channel multiplexed over a connection and owns an ordered
//! list of links (creation order).

use super::link::{Link, Role};
use crate::endpoint::{Condition, Endpoint, EndpointState, Lifecycle, Side, State};
use crate::error::{AmqpError, Result};
use crate::iter::{LinkCursor, LinkIter, LinkRange};

/// A session endpoint, owned by a [`Connection`](super::Connection)
#[derive(Debug)]
pub struct Session {
    /// Channel number
    channel: u16,
    /// Highest handle a link may be given
    handle_max: u32,
    /// Local/remote lifecycle
    endpoint: EndpointState,
    /// Links in creation order
    links: Vec<Link>,
}

impl Session {
    pub(crate) fn new(channel: u16, handle_max: u32) -> Self {
        Self {
            channel,
            handle_max,
            endpoint: EndpointState::new(),
            links: Vec::new(),
        }
    }

    /// Get channel number
    pub fn channel(&self) -> u16 {
        self.channel
    }

    /// Number of links owned by this session
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Find a link by name
    pub fn link(&self, name: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.name() == name)
    }

    /// Find a link by name, mutably
    pub fn link_mut(&mut self, name: &str) -> Option<&mut Link> {
        self.links.iter_mut().find(|l| l.name() == name)
    }

    /// Create a new link on this session, using the lowest free handle.
    pub fn attach_link(&mut self, name: impl Into<String>, role: Role) -> Result<&mut Link> {
        let name = name.into();
        if self.link(&name).is_some() {
            return Err(AmqpError::DuplicateLink(name));
        }

        let handle = self.free_handle().ok_or_else(|| {
            tracing::warn!(channel = self.channel, "No free link handle");
            AmqpError::HandleMaxExceeded(self.handle_max)
        })?;

        tracing::debug!(channel = self.channel, handle, link = %name, %role, "Link created");
        self.links.push(Link::new(name, handle, role));
        let index = self.links.len() - 1;
        Ok(&mut self.links[index])
    }

    /// Remove a link from this session
    pub fn detach_link(&mut self, name: &str) -> Option<Link> {
        let index = self.links.iter().position(|l| l.name() == name)?;
        let link = self.links.remove(index);
        tracing::debug!(channel = self.channel, handle = link.handle(), link = name, "Link removed");
        Some(link)
    }

    /// Links of this session whose state matches `mask`
    pub fn links(&self, mask: State) -> LinkRange<'_> {
        LinkRange::new(
            LinkIter::new(LinkCursor::session(self), mask),
            LinkIter::end(),
        )
    }

    /// Open the local side (BEGIN sent)
    pub fn begin(&mut self) -> Result<()> {
        self.set(Side::Local, Lifecycle::Active, None)
    }

    /// Close the local side (END sent)
    pub fn end(&mut self) -> Result<()> {
        self.set(Side::Local, Lifecycle::Closed, None)
    }

    /// Close the local side with an error condition
    pub fn end_with(&mut self, condition: Condition) -> Result<()> {
        self.set(Side::Local, Lifecycle::Closed, Some(condition))
    }

    /// Record that the peer began the session
    pub fn remote_begin(&mut self) -> Result<()> {
        self.set(Side::Remote, Lifecycle::Active, None)
    }

    /// Record that the peer ended the session, optionally with an error
    pub fn remote_end(&mut self, condition: Option<Condition>) -> Result<()> {
        self.set(Side::Remote, Lifecycle::Closed, condition)
    }

    pub(crate) fn link_slice(&self) -> &[Link] {
        &self.links
    }

    fn free_handle(&self) -> Option<u32> {
        // Links are few; a linear probe over the live handles is enough.
        (0..=self.handle_max).find(|h| self.links.iter().all(|l| l.handle() != *h))
    }

    fn set(&mut self, side: Side, to: Lifecycle, condition: Option<Condition>) -> Result<()> {
        let channel = self.channel;
        let label = || format!("session {channel}");
        let changed = match to {
            Lifecycle::Closed => self.endpoint.close(side, condition, label)?,
            _ => self.endpoint.transition(side, to, label)?,
        };
        if changed {
            tracing::debug!(channel, state = %self.endpoint.state(), "Session {side} -> {to:?}");
        }
        Ok(())
    }
}

impl Endpoint for Session {
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

    #[test]
    fn test_attach_assigns_lowest_free_handle() {
        let mut session = Session::new(0, 10);
        assert_eq!(session.attach_link("a", Role::Sender).unwrap().handle(), 0);
        assert_eq!(session.attach_link("b", Role::Sender).unwrap().handle(), 1);
        assert_eq!(session.attach_link("c", Role::Receiver).unwrap().handle(), 2);

        session.detach_link("b").unwrap();
        assert_eq!(session.attach_link("d", Role::Receiver).unwrap().handle(), 1);

        let names: Vec<&str> = session.link_slice().iter().map(Link::name).collect();
        assert_eq!(names, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_duplicate_link_rejected() {
        let mut session = Session::new(0, 10);
        session.attach_link("a", Role::Sender).unwrap();
        let err = session.attach_link("a", Role::Receiver).unwrap_err();
        assert!(matches!(err, AmqpError::DuplicateLink(name) if name == "a"));
        assert_eq!(session.link_count(), 1);
    }

    #[test]
    fn test_handle_max_exceeded() {
        let mut session = Session::new(0, 1);
        session.attach_link("a", Role::Sender).unwrap();
        session.attach_link("b", Role::Sender).unwrap();
        let err = session.attach_link("c", Role::Sender).unwrap_err();
        assert!(matches!(err, AmqpError::HandleMaxExceeded(1)));
    }

    #[test]
    fn test_detach_unknown_link() {
        let mut session = Session::new(0, 10);
        assert!(session.detach_link("missing").is_none());
    }

    #[test]
    fn test_session_lifecycle() {
        let mut session = Session::new(4, 10);
        session.begin().unwrap();
        session.remote_begin().unwrap();
        assert_eq!(session.state(), State::LOCAL_ACTIVE | State::REMOTE_ACTIVE);

        session.remote_end(None).unwrap();
        session.end().unwrap();
        assert_eq!(session.state(), State::LOCAL_CLOSED | State::REMOTE_CLOSED);

        let err = session.remote_begin().unwrap_err();
        assert!(err.to_string().contains("session 4"));
    }

    #[test]
    fn test_links_by_mask() {
        let mut session = Session::new(0, 10);
        session.attach_link("a", Role::Sender).unwrap().attach().unwrap();
        session.attach_link("b", Role::Receiver).unwrap();
        session.attach_link("c", Role::Sender).unwrap().attach().unwrap();

        let active: Vec<&str> = session
            .links(State::LOCAL_ACTIVE)
            .into_iter()
            .map(Link::name)
            .collect();
        assert_eq!(active, vec!["a", "c"]);

        assert!(session.links(State::REMOTE_ACTIVE).is_empty());
    }
}
