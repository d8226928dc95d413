//! State management module.
//!
//! Contains the per-connection session, the joined channel with its roster,
//! and the connection lifecycle state.

mod channel;
mod machine;
mod session;

pub use channel::{Channel, ChannelUser};
pub use machine::ConnectionState;
pub use session::Session;
