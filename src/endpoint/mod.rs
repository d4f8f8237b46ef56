//! Endpoint lifecycle state and state-mask matching.
//!
//! Every AMQP endpoint (connection, session, link) has two independent
//! lifecycles: the local one driven by this engine and the remote one driven
//! by the peer's frames. Both are encoded together as a [`State`] bitmask.
//!
//! ## State Bits
//!
//! | Bit | Name            | Meaning                            |
//! |-----|-----------------|------------------------------------|
//! | 0   | `LOCAL_UNINIT`  | Local endpoint not yet opened      |
//! | 1   | `LOCAL_ACTIVE`  | Local endpoint open                |
//! | 2   | `LOCAL_CLOSED`  | Local endpoint closed              |
//! | 3   | `REMOTE_UNINIT` | Peer has not opened its endpoint   |
//! | 4   | `REMOTE_ACTIVE` | Peer endpoint open                 |
//! | 5   | `REMOTE_CLOSED` | Peer endpoint closed               |
//!
//! ## Matching
//!
//! A query mask is matched against an endpoint as follows:
//!
//! | Query bits          | Mode   | Matches when                                |
//! |---------------------|--------|---------------------------------------------|
//! | local and remote    | exact  | both sides equal the query's sides          |
//! | local only          | any-of | actual local bit is one of the query's bits |
//! | remote only         | any-of | actual remote bit is one of the query's bits|
//! | none                | -      | never                                       |
//!
//! ```rust,ignore
//! use amqp::endpoint::{matches, State};
//!
//! let actual = State::LOCAL_ACTIVE | State::REMOTE_UNINIT;
//! assert!(matches(actual, State::LOCAL_ACTIVE));
//! assert!(!matches(actual, State::LOCAL_ACTIVE | State::REMOTE_ACTIVE));
//! ```

mod condition;
mod lifecycle;
mod state;

pub use condition::{symbols, Condition};
pub use lifecycle::{EndpointState, Lifecycle, Side};
pub use state::{matches, State};

/// A protocol object with independently evolving local and remote state.
pub trait Endpoint {
    /// Current actual state (one local bit, one remote bit)
    fn state(&self) -> State;

    /// Local error condition, if closed with one
    fn condition(&self) -> Option<&Condition>;

    /// Error condition reported by the peer, if any
    fn remote_condition(&self) -> Option<&Condition>;

    /// Check this endpoint against a query mask
    fn matches(&self, query: State) -> bool {
        matches(self.state(), query)
    }
}

impl Endpoint for EndpointState {
    fn state(&self) -> State {
        EndpointState::state(self)
    }

    fn condition(&self) -> Option<&Condition> {
        EndpointState::condition(self)
    }

    fn remote_condition(&self) -> Option<&Condition> {
        EndpointState::remote_condition(self)
    }
}
