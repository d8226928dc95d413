//! Network module.
//!
//! Contains the byte transports and outbound rate limiting.

pub mod limit;
mod transport;

pub use limit::{DrainReport, EnqueueError, OutboundMessage, SendQueue};
pub use transport::{MemoryTransport, TcpTransport, Transport};
