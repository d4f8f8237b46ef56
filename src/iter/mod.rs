//! Filtered, borrow-bound iteration over a connection's endpoints.
//!
//! An [`EndpointIter`] walks an owner's collection in creation order and only
//! stops on endpoints whose actual state matches a query mask. The walk itself
//! is delegated to a [`Cursor`], chosen statically per element kind:
//!
//! ```text
//!                     EndpointIter<'a, C>
//!                  (skip-until-match loop)
//!                            │
//!              ┌─────────────┴─────────────┐
//!              ▼                           ▼
//!     SessionCursor<'a>              LinkCursor<'a>
//!   connection.sessions[..]     sessions[..].links[..]
//!                                (or one session only)
//! ```
//!
//! Iterators and ranges borrow the owning [`Connection`](crate::Connection)
//! or [`Session`](crate::Session), so adding or removing endpoints while a
//! traversal is live does not compile.
//!
//! # Usage
//!
//! ```rust,ignore
//! use amqp::{Connection, State};
//!
//! let connection = Connection::new();
//! for session in connection.sessions(State::LOCAL_ACTIVE) {
//!     println!("channel {} is open locally", session.channel());
//! }
//! ```

mod cursor;
mod range;

pub use cursor::{LinkCursor, LinkScope, SessionCursor};
pub use range::Range;

use std::fmt;
use std::iter::FusedIterator;

use crate::endpoint::{Endpoint, State};
use crate::engine::{Link, Session};
use crate::error::{AmqpError, Result};

/// Advance strategy for one element kind.
///
/// `step` yields the next structural candidate after the current position,
/// in creation order, without any filtering.
pub trait Cursor<'a>: Clone {
    /// Element kind visited by this cursor
    type Item: Endpoint + 'a;

    /// Next candidate, or `None` once the collection is exhausted
    fn step(&mut self) -> Option<&'a Self::Item>;
}

/// Iterator over the endpoints of a collection that match a state mask.
///
/// Advancing past the last match moves the iterator to the end sentinel.
/// Advancing an iterator already at the end leaves it there.
pub struct EndpointIter<'a, C: Cursor<'a>> {
    cursor: Option<C>,
    current: Option<&'a C::Item>,
    mask: State,
}

/// Iterator over sessions matching a mask
pub type SessionIter<'a> = EndpointIter<'a, SessionCursor<'a>>;
/// Range of sessions matching a mask
pub type SessionRange<'a> = Range<SessionIter<'a>>;
/// Iterator over links matching a mask
pub type LinkIter<'a> = EndpointIter<'a, LinkCursor<'a>>;
/// Range of links matching a mask
pub type LinkRange<'a> = Range<LinkIter<'a>>;

impl<'a, C: Cursor<'a>> EndpointIter<'a, C> {
    /// Create an iterator positioned at the first endpoint matching `mask`
    pub fn new(cursor: C, mask: State) -> Self {
        let mut iter = Self {
            cursor: Some(cursor),
            current: None,
            mask,
        };
        iter.advance();
        iter
    }

    /// Create the end sentinel
    pub fn end() -> Self {
        Self {
            cursor: None,
            current: None,
            mask: State::EMPTY,
        }
    }

    /// Query mask this iterator filters on
    pub fn mask(&self) -> State {
        self.mask
    }

    /// Check if positioned at the end sentinel
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Current endpoint, or `None` at the end
    pub fn get(&self) -> Option<&'a C::Item> {
        self.current
    }

    /// Current endpoint.
    ///
    /// Fails with [`AmqpError::InvalidState`] when positioned at the end.
    pub fn current(&self) -> Result<&'a C::Item> {
        self.current.ok_or_else(|| {
            AmqpError::InvalidState("Dereferenced an iterator at end".to_string())
        })
    }

    /// Move to the next matching endpoint, skipping non-matching ones.
    pub fn advance(&mut self) {
        let Some(cursor) = self.cursor.as_mut() else {
            self.current = None;
            return;
        };

        while let Some(candidate) = cursor.step() {
            if Endpoint::matches(candidate, self.mask) {
                self.current = Some(candidate);
                return;
            }
            tracing::trace!(
                state = %candidate.state(),
                mask = %self.mask,
                "Skipping non-matching endpoint"
            );
        }

        self.current = None;
        self.cursor = None;
    }
}

impl<'a, C: Cursor<'a>> Clone for EndpointIter<'a, C> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone(),
            current: self.current,
            mask: self.mask,
        }
    }
}

impl<'a, C: Cursor<'a>> PartialEq for EndpointIter<'a, C> {
    fn eq(&self, other: &Self) -> bool {
        match (self.current, other.current) {
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<'a, C: Cursor<'a>> Eq for EndpointIter<'a, C> {}

impl<'a, C: Cursor<'a>> Iterator for EndpointIter<'a, C> {
    type Item = &'a C::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.current?;
        self.advance();
        Some(item)
    }
}

impl<'a, C: Cursor<'a>> FusedIterator for EndpointIter<'a, C> {}

impl<'a, C: Cursor<'a>> fmt::Debug for EndpointIter<'a, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointIter")
            .field("current", &self.current.map(Endpoint::state))
            .field("mask", &self.mask)
            .finish()
    }
}

impl<'a> SessionIter<'a> {
    /// Channel of the current session, or `None` at the end
    pub fn channel(&self) -> Option<u16> {
        self.get().map(Session::channel)
    }
}

impl<'a> LinkIter<'a> {
    /// Name of the current link, or `None` at the end
    pub fn name(&self) -> Option<&'a str> {
        self.get().map(Link::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{EndpointState, Lifecycle, Side};

    /// Cursor over a flat slice of bare endpoint states
    #[derive(Clone)]
    struct SliceCursor<'a> {
        items: &'a [EndpointState],
        next: usize,
    }

    impl<'a> Cursor<'a> for SliceCursor<'a> {
        type Item = EndpointState;

        fn step(&mut self) -> Option<&'a EndpointState> {
            let item = self.items.get(self.next)?;
            self.next += 1;
            Some(item)
        }
    }

    fn endpoint(local: Lifecycle, remote: Lifecycle) -> EndpointState {
        let mut state = EndpointState::new();
        let label = || "test".to_string();
        state.transition(Side::Local, local, label).unwrap();
        state.transition(Side::Remote, remote, label).unwrap();
        state
    }

    fn iter(items: &[EndpointState], mask: State) -> EndpointIter<'_, SliceCursor<'_>> {
        EndpointIter::new(SliceCursor { items, next: 0 }, mask)
    }

    fn fixture() -> Vec<EndpointState> {
        vec![
            endpoint(Lifecycle::Uninit, Lifecycle::Uninit),
            endpoint(Lifecycle::Active, Lifecycle::Active),
            endpoint(Lifecycle::Closed, Lifecycle::Uninit),
            endpoint(Lifecycle::Active, Lifecycle::Closed),
        ]
    }

    #[test]
    fn test_skips_to_first_match() {
        let items = fixture();
        let it = iter(&items, State::LOCAL_ACTIVE);
        assert!(std::ptr::eq(it.current().unwrap(), &items[1]));
    }

    #[test]
    fn test_single_advance_skips_non_matching() {
        let items = fixture();
        let mut it = iter(&items, State::LOCAL_ACTIVE);
        it.advance();
        assert!(std::ptr::eq(it.current().unwrap(), &items[3]));
        it.advance();
        assert!(it.is_end());
    }

    #[test]
    fn test_current_at_end_is_invalid_state() {
        let items = fixture();
        let it = iter(&items, State::LOCAL_CLOSED | State::REMOTE_CLOSED);
        assert!(it.is_end());
        assert!(matches!(it.current(), Err(AmqpError::InvalidState(_))));
        assert!(matches!(
            EndpointIter::<SliceCursor<'_>>::end().current(),
            Err(AmqpError::InvalidState(_))
        ));
    }

    #[test]
    fn test_advance_at_end_is_idempotent() {
        let items = fixture();
        let mut it = iter(&items, State::REMOTE_CLOSED);
        it.advance();
        assert!(it.is_end());
        it.advance();
        it.advance();
        assert!(it.is_end());
        assert_eq!(it, EndpointIter::end());
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_equality_ignores_mask() {
        let items = fixture();
        let a = iter(&items, State::LOCAL_ACTIVE);
        let b = iter(&items, State::REMOTE_ACTIVE);
        assert_ne!(a.mask(), b.mask());
        assert_eq!(a, b);

        let c = iter(&items, State::LOCAL_UNINIT);
        assert_ne!(a, c);
        assert_ne!(c, EndpointIter::end());
    }

    #[test]
    fn test_clone_advances_independently() {
        let items = fixture();
        let a = iter(&items, State::LOCAL_ACTIVE);
        let mut b = a.clone();
        b.advance();
        assert!(std::ptr::eq(a.current().unwrap(), &items[1]));
        assert!(std::ptr::eq(b.current().unwrap(), &items[3]));
    }

    #[test]
    fn test_iterator_yields_matches_in_order() {
        let items = fixture();
        let found: Vec<State> = iter(&items, State::REMOTE_UNINIT)
            .map(Endpoint::state)
            .collect();
        assert_eq!(
            found,
            vec![
                State::LOCAL_UNINIT | State::REMOTE_UNINIT,
                State::LOCAL_CLOSED | State::REMOTE_UNINIT,
            ]
        );
    }

    #[test]
    fn test_empty_collection() {
        let it = iter(&[], State::ANY);
        assert!(it.is_end());
        assert_eq!(it.count(), 0);
    }
}
