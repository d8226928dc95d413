//! Unified error handling for the client.
//!
//! [`ClientError`] is what the connection driver and the outbound API
//! return. Every variant carries a static label for structured logs.

use thiserror::Error;
use tickirc_proto::ProtocolError;

use crate::network::limit::EnqueueError;

/// Errors surfaced by [`Client`](crate::Client) operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("send queue full: {0}")]
    QueueFull(#[from] EnqueueError),

    #[error("not connected")]
    NotConnected,

    #[error("already connected or connecting")]
    AlreadyConnected,

    #[error("already in channel {0}")]
    AlreadyInChannel(String),

    #[error("not in channel {0}")]
    NotInChannel(String),

    #[error("no channel joined")]
    NoChannel,

    #[error("invalid channel name: {0}")]
    InvalidChannel(String),

    #[error("connection closed: {0}")]
    Closed(String),
}

impl ClientError {
    /// Get a static error code string for log labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Protocol(e) => e.error_code(),
            Self::QueueFull(_) => "queue_full",
            Self::NotConnected => "not_connected",
            Self::AlreadyConnected => "already_connected",
            Self::AlreadyInChannel(_) => "already_in_channel",
            Self::NotInChannel(_) => "not_in_channel",
            Self::NoChannel => "no_channel",
            Self::InvalidChannel(_) => "invalid_channel",
            Self::Closed(_) => "closed",
        }
    }

    /// Whether the connection was torn down because of this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Protocol(_) | Self::Closed(_))
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
