//! Structural walks over sessions and links.

use std::fmt;

use super::Cursor;
use crate::engine::{Connection, Link, Session};

/// Walks a connection's sessions in creation order.
#[derive(Clone, Copy)]
pub struct SessionCursor<'a> {
    sessions: &'a [Session],
    next: usize,
}

impl<'a> SessionCursor<'a> {
    /// Cursor positioned before the connection's first session
    pub fn new(connection: &'a Connection) -> Self {
        Self {
            sessions: connection.session_slice(),
            next: 0,
        }
    }
}

impl<'a> Cursor<'a> for SessionCursor<'a> {
    type Item = Session;

    fn step(&mut self) -> Option<&'a Session> {
        let session = self.sessions.get(self.next)?;
        self.next += 1;
        Some(session)
    }
}

impl fmt::Debug for SessionCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCursor")
            .field("sessions", &self.sessions.len())
            .field("next", &self.next)
            .finish()
    }
}

/// Traversal scope of a [`LinkCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScope {
    /// Every link of every session on the connection
    Connection,
    /// Only the links of the session on this channel
    Session(u16),
}

/// Walks links in creation order, session by session.
#[derive(Clone, Copy)]
pub struct LinkCursor<'a> {
    sessions: &'a [Session],
    scope: LinkScope,
    session: usize,
    link: usize,
}

impl<'a> LinkCursor<'a> {
    /// Cursor over all links of a connection, in session order and then link
    /// order within each session
    pub fn connection(connection: &'a Connection) -> Self {
        Self {
            sessions: connection.session_slice(),
            scope: LinkScope::Connection,
            session: 0,
            link: 0,
        }
    }

    /// Cursor restricted to the links of a single session
    pub fn session(session: &'a Session) -> Self {
        Self {
            sessions: std::slice::from_ref(session),
            scope: LinkScope::Session(session.channel()),
            session: 0,
            link: 0,
        }
    }

    /// Traversal scope
    pub fn scope(&self) -> LinkScope {
        self.scope
    }
}

impl<'a> Cursor<'a> for LinkCursor<'a> {
    type Item = Link;

    fn step(&mut self) -> Option<&'a Link> {
        while let Some(session) = self.sessions.get(self.session) {
            if let Some(link) = session.link_slice().get(self.link) {
                self.link += 1;
                return Some(link);
            }
            self.session += 1;
            self.link = 0;
        }
        None
    }
}

impl fmt::Debug for LinkCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkCursor")
            .field("scope", &self.scope)
            .field("session", &self.session)
            .field("link", &self.link)
            .finish()
    }
}
