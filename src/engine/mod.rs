//! Endpoint owners: connection, session, link.
//!
//! ```text
//! Connection
//!   ├── Session (channel 0)
//!   │     ├── Link "orders"   (handle 0)
//!   │     └── Link "invoices" (handle 1)
//!   └── Session (channel 1)
//!         └── Link "events"   (handle 0)
//! ```
//!
//! Each owner keeps its children in creation order. The frame-driven engine
//! calls the transition methods (`open`, `begin`, `attach`, `remote_*`, ...)
//! as frames are sent and received; this module only records the result.

mod connection;
mod link;
mod session;

pub use connection::Connection;
pub use link::{Link, Role};
pub use session::Session;
