//! Endpoint state bitmask and query matching.
//!
//! A [`State`] is either the *actual* state of an endpoint (exactly one local
//! bit and one remote bit) or a *query* mask (any number of bits per side).
//!
//! - Bits 0-2: local side (UNINIT, ACTIVE, CLOSED)
//! - Bits 3-5: remote side (UNINIT, ACTIVE, CLOSED)

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;

use crate::error::AmqpError;

/// Combined local + remote endpoint state bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct State(u8);

impl State {
    /// Local endpoint is un-initialized
    pub const LOCAL_UNINIT: State = State(1 << 0);
    /// Local endpoint is active
    pub const LOCAL_ACTIVE: State = State(1 << 1);
    /// Local endpoint has been closed
    pub const LOCAL_CLOSED: State = State(1 << 2);
    /// Remote endpoint is un-initialized
    pub const REMOTE_UNINIT: State = State(1 << 3);
    /// Remote endpoint is active
    pub const REMOTE_ACTIVE: State = State(1 << 4);
    /// Remote endpoint has been closed
    pub const REMOTE_CLOSED: State = State(1 << 5);

    /// All local bits (UNINIT, ACTIVE, CLOSED)
    pub const LOCAL_MASK: State = State(0b000_111);
    /// All remote bits (UNINIT, ACTIVE, CLOSED)
    pub const REMOTE_MASK: State = State(0b111_000);

    /// No bits set. As a query it matches nothing.
    pub const EMPTY: State = State(0);

    /// Query satisfied by every actual state.
    ///
    /// This is a one-sided any-of mask. Note that `LOCAL_MASK | REMOTE_MASK`
    /// is *not* equivalent: with both sides populated the query switches to
    /// exact matching, which no actual state can satisfy.
    pub const ANY: State = State::LOCAL_MASK;

    const NAMES: [(State, &'static str); 6] = [
        (State::LOCAL_UNINIT, "LOCAL_UNINIT"),
        (State::LOCAL_ACTIVE, "LOCAL_ACTIVE"),
        (State::LOCAL_CLOSED, "LOCAL_CLOSED"),
        (State::REMOTE_UNINIT, "REMOTE_UNINIT"),
        (State::REMOTE_ACTIVE, "REMOTE_ACTIVE"),
        (State::REMOTE_CLOSED, "REMOTE_CLOSED"),
    ];

    /// Create from raw bits. Undefined bits are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & (Self::LOCAL_MASK.0 | Self::REMOTE_MASK.0))
    }

    /// Get raw bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Local half of the mask
    pub const fn local(self) -> State {
        State(self.0 & Self::LOCAL_MASK.0)
    }

    /// Remote half of the mask
    pub const fn remote(self) -> State {
        State(self.0 & Self::REMOTE_MASK.0)
    }

    /// Check if every bit of `other` is set
    pub const fn contains(self, other: State) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check if no bits are set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check whether this is a valid actual endpoint state: exactly one local
    /// bit and exactly one remote bit.
    pub const fn is_actual(self) -> bool {
        self.local().0.count_ones() == 1 && self.remote().0.count_ones() == 1
    }

    /// Match this actual state against a query mask. See [`matches`].
    pub fn matches(self, query: State) -> bool {
        matches(self, query)
    }
}

/// Match an endpoint's actual state against a query mask.
///
/// If the query carries both local and remote bits, the match is exact: each
/// side of `actual` must equal that side of `query`. If it carries bits on
/// one side only, the match succeeds when the actual bit on that side is any
/// of the requested ones and the other side is ignored. An empty query
/// matches nothing; use [`State::ANY`] as the "no filter" mask (a zero mask
/// means "no filter" in the C engine API, not here).
pub fn matches(actual: State, query: State) -> bool {
    let qlocal = query.local();
    let qremote = query.remote();

    match (qlocal.is_empty(), qremote.is_empty()) {
        (false, false) => actual.local() == qlocal && actual.remote() == qremote,
        (false, true) => !(actual & qlocal).is_empty(),
        (true, false) => !(actual & qremote).is_empty(),
        (true, true) => false,
    }
}

impl BitOr for State {
    type Output = State;

    fn bitor(self, rhs: State) -> State {
        State(self.0 | rhs.0)
    }
}

impl BitOrAssign for State {
    fn bitor_assign(&mut self, rhs: State) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for State {
    type Output = State;

    fn bitand(self, rhs: State) -> State {
        State(self.0 & rhs.0)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("EMPTY");
        }
        let mut first = true;
        for (bit, name) in Self::NAMES {
            if self.contains(bit) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl FromStr for State {
    type Err = AmqpError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut state = State::EMPTY;
        for part in s.split('|').map(str::trim) {
            state |= match part.to_uppercase().as_str() {
                "LOCAL_UNINIT" => State::LOCAL_UNINIT,
                "LOCAL_ACTIVE" => State::LOCAL_ACTIVE,
                "LOCAL_CLOSED" => State::LOCAL_CLOSED,
                "REMOTE_UNINIT" => State::REMOTE_UNINIT,
                "REMOTE_ACTIVE" => State::REMOTE_ACTIVE,
                "REMOTE_CLOSED" => State::REMOTE_CLOSED,
                "LOCAL_MASK" => State::LOCAL_MASK,
                "REMOTE_MASK" => State::REMOTE_MASK,
                "ANY" => State::ANY,
                "EMPTY" | "" => State::EMPTY,
                other => {
                    return Err(AmqpError::InvalidState(format!(
                        "Unknown state name: {other}"
                    )))
                },
            };
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actual_states() -> Vec<State> {
        let locals = [State::LOCAL_UNINIT, State::LOCAL_ACTIVE, State::LOCAL_CLOSED];
        let remotes = [
            State::REMOTE_UNINIT,
            State::REMOTE_ACTIVE,
            State::REMOTE_CLOSED,
        ];
        locals
            .iter()
            .flat_map(|l| remotes.iter().map(move |r| *l | *r))
            .collect()
    }

    #[test]
    fn test_masks_partition_bits() {
        assert_eq!(State::LOCAL_MASK & State::REMOTE_MASK, State::EMPTY);
        assert_eq!(
            State::LOCAL_UNINIT | State::LOCAL_ACTIVE | State::LOCAL_CLOSED,
            State::LOCAL_MASK
        );
        assert_eq!(
            State::REMOTE_UNINIT | State::REMOTE_ACTIVE | State::REMOTE_CLOSED,
            State::REMOTE_MASK
        );
    }

    #[test]
    fn test_exact_match_mode() {
        let query = State::LOCAL_ACTIVE | State::REMOTE_ACTIVE;
        assert!(matches(State::LOCAL_ACTIVE | State::REMOTE_ACTIVE, query));
        assert!(!matches(State::LOCAL_ACTIVE | State::REMOTE_UNINIT, query));
        assert!(!matches(State::LOCAL_CLOSED | State::REMOTE_ACTIVE, query));
    }

    #[test]
    fn test_exact_mode_with_multiple_bits_matches_nothing() {
        let query = State::LOCAL_ACTIVE | State::LOCAL_CLOSED | State::REMOTE_ACTIVE;
        for actual in actual_states() {
            assert!(!matches(actual, query), "{actual} should not match");
        }
        for actual in actual_states() {
            assert!(!matches(actual, State::LOCAL_MASK | State::REMOTE_MASK));
        }
    }

    #[test]
    fn test_any_of_local() {
        let query = State::LOCAL_ACTIVE | State::LOCAL_CLOSED;
        assert!(matches(State::LOCAL_ACTIVE | State::REMOTE_UNINIT, query));
        assert!(matches(State::LOCAL_CLOSED | State::REMOTE_CLOSED, query));
        assert!(!matches(State::LOCAL_UNINIT | State::REMOTE_ACTIVE, query));
    }

    #[test]
    fn test_any_of_remote() {
        let query = State::REMOTE_CLOSED;
        assert!(matches(State::LOCAL_ACTIVE | State::REMOTE_CLOSED, query));
        assert!(!matches(State::LOCAL_CLOSED | State::REMOTE_ACTIVE, query));
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        for actual in actual_states() {
            assert!(!matches(actual, State::EMPTY));
        }
    }

    #[test]
    fn test_any_matches_everything() {
        for actual in actual_states() {
            assert!(actual.is_actual());
            assert!(actual.matches(State::ANY));
            assert!(actual.matches(State::REMOTE_MASK));
        }
    }

    #[test]
    fn test_is_actual() {
        assert!((State::LOCAL_UNINIT | State::REMOTE_UNINIT).is_actual());
        assert!(!State::LOCAL_ACTIVE.is_actual());
        assert!(!(State::LOCAL_MASK | State::REMOTE_ACTIVE).is_actual());
        assert!(!State::EMPTY.is_actual());
    }

    #[test]
    fn test_from_bits_drops_undefined() {
        assert_eq!(State::from_bits(0xFF), State::LOCAL_MASK | State::REMOTE_MASK);
        assert_eq!(State::from_bits(0b10_0010).bits(), 0b10_0010);
    }

    #[test]
    fn test_display() {
        assert_eq!(State::EMPTY.to_string(), "EMPTY");
        assert_eq!(
            (State::LOCAL_ACTIVE | State::REMOTE_CLOSED).to_string(),
            "LOCAL_ACTIVE|REMOTE_CLOSED"
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "local_active | REMOTE_UNINIT".parse::<State>().unwrap(),
            State::LOCAL_ACTIVE | State::REMOTE_UNINIT
        );
        assert_eq!("any".parse::<State>().unwrap(), State::ANY);
        assert_eq!("empty".parse::<State>().unwrap(), State::EMPTY);
        assert!("LOCAL_OPEN".parse::<State>().is_err());

        let state = State::LOCAL_CLOSED | State::REMOTE_ACTIVE;
        assert_eq!(state.to_string().parse::<State>().unwrap(), state);
    }
}
