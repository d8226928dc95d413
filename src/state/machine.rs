//! Connection lifecycle state.
//!
//! ```text
//! ┌──────────────┐  connect()   ┌────────────┐  handshake flushed  ┌───────────┐
//! │ Disconnected ├─────────────►│ Connecting ├────────────────────►│ Connected │
//! └──────▲───────┘              └─────┬──────┘                     └─────┬─────┘
//!        │      transport failure     │                                  │
//!        ├────────────────────────────┘                                  │
//!        │  disconnect(), transport/parse failure, server ERROR          │
//!        └───────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

/// Where the client is in its connection lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
