//! # AMQP Core - Endpoint State and Filtered Traversal
//!
//! The endpoint layer of an AMQP 1.0 protocol engine. A [`Connection`] owns
//! [`Session`]s (channels), each of which owns [`Link`]s (senders and
//! receivers). Every endpoint carries two independent lifecycles, local and
//! remote, encoded together as a [`State`] bitmask.
//!
//! ## Features
//!
//! - **Dual-sided lifecycle**: `UNINIT -> ACTIVE -> CLOSED` per side, never backwards
//! - **State queries**: exact or any-of matching against a [`State`] mask
//! - **Filtered ranges**: lazy iteration over matching sessions and links
//! - **Borrow-bound**: ranges cannot outlive or race with their owner
//!
//! ## Architecture
//!
//! ```text
//!  caller ── sessions(mask) ──> Connection ──> SessionRange ─┐
//!        ── links(mask) ──────> Connection ──> LinkRange ────┤ EndpointIter
//!        ── links(mask) ──────> Session ────> LinkRange ────┘  (skip loop)
//!                                                                  │
//!                                                   endpoint::matches(state, mask)
//! ```
//!
//! ## Matching Rules
//!
//! | Query                           | Mode   | Matches                          |
//! |---------------------------------|--------|----------------------------------|
//! | `LOCAL_ACTIVE`                  | any-of | local side active                |
//! | `LOCAL_ACTIVE \| LOCAL_CLOSED`  | any-of | local side active or closed      |
//! | `REMOTE_CLOSED`                 | any-of | remote side closed               |
//! | `LOCAL_ACTIVE \| REMOTE_ACTIVE` | exact  | both sides active, nothing else  |
//! | `ANY`                           | any-of | every endpoint                   |
//! | `EMPTY`                         | -      | nothing                          |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use amqp::{Connection, Role, State};
//!
//! let mut connection = Connection::new();
//! let session = connection.begin_session()?;
//! session.begin()?;
//! session.attach_link("orders", Role::Sender)?.attach()?;
//!
//! // Peer confirmed the session
//! connection.session_mut(0).unwrap().remote_begin()?;
//!
//! for session in connection.sessions(State::LOCAL_ACTIVE | State::REMOTE_ACTIVE) {
//!     println!("channel {} fully open", session.channel());
//! }
//!
//! // Links we opened that the peer has not answered yet
//! let pending = connection.links(State::LOCAL_ACTIVE | State::REMOTE_UNINIT);
//! assert_eq!(pending.into_iter().count(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`endpoint`]: State bitmask, matching, lifecycles, conditions
//! - [`iter`]: Filtering iterators, cursors, ranges
//! - [`engine`]: Connection / Session / Link owners
//! - [`config`]: Configuration management
//! - [`error`]: Error types and result aliases

pub mod config;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod iter;

// Re-exports for convenience
pub use config::{Config, ConnectionConfig};
pub use endpoint::{matches, Condition, Endpoint, Lifecycle, Side, State};
pub use engine::{Connection, Link, Role, Session};
pub use error::{AmqpError, Result};
pub use iter::{EndpointIter, LinkIter, LinkRange, Range, SessionIter, SessionRange};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// AMQP protocol version implemented by the endpoint model
pub const PROTOCOL_VERSION: &str = "1.0";
