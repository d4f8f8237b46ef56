//! AMQP error conditions attached to closed endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Well-known AMQP 1.0 condition symbols
pub mod symbols {
    /// An internal error occurred
    pub const INTERNAL_ERROR: &str = "amqp:internal-error";
    /// A peer attempted to work with a remote entity that does not exist
    pub const NOT_FOUND: &str = "amqp:not-found";
    /// A peer attempted to work with a remote entity to which it has no access
    pub const UNAUTHORIZED_ACCESS: &str = "amqp:unauthorized-access";
    /// Data could not be decoded
    pub const DECODE_ERROR: &str = "amqp:decode-error";
    /// A peer exceeded its resource allocation
    pub const RESOURCE_LIMIT_EXCEEDED: &str = "amqp:resource-limit-exceeded";
    /// The peer tried to use a frame in a manner that is inconsistent with the protocol
    pub const ILLEGAL_STATE: &str = "amqp:illegal-state";
    /// An operator intervened to detach the link
    pub const LINK_DETACH_FORCED: &str = "amqp:link:detach-forced";
    /// The handle used for a link is not currently attached
    pub const SESSION_UNATTACHED_HANDLE: &str = "amqp:session:unattached-handle";
    /// An operator intervened to close the connection
    pub const CONNECTION_FORCED: &str = "amqp:connection:forced";
}

/// Error condition carried by a closing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    /// Symbolic condition name (e.g. `amqp:not-found`)
    pub name: String,
    /// Human readable description
    #[serde(default)]
    pub description: String,
}

impl Condition {
    /// Create a new condition
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}: {}", self.name, self.description)
        }
    }
}
