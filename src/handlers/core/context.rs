//! Handler context and core types.
//!
//! A [`Context`] borrows everything one server message may touch: the
//! session, the outbound queue, the host callbacks and the configuration.

use std::time::Instant;

use thiserror::Error;
use tickirc_proto::{Command, ProtocolError, ServerMessage};
use tracing::debug;

use crate::config::Config;
use crate::host::{Host, deliver_chat};
use crate::network::{EnqueueError, OutboundMessage, SendQueue};
use crate::state::Session;

/// Handler context passed to each server-message handler.
pub struct Context<'a> {
    /// Our nickname and joined channel.
    pub session: &'a mut Session,
    /// Rate-limited outbound queue.
    pub queue: &'a mut SendQueue,
    /// The embedding application.
    pub host: &'a mut dyn Host,
    /// Client configuration.
    pub config: &'a Config,
    /// Lines that bypass the queue and go out before the next drain.
    pub urgent: &'a mut Vec<OutboundMessage>,
    /// When the message was received.
    pub now: Instant,
}

impl Context<'_> {
    /// Show a line of chat output.
    pub fn chat(&mut self, line: impl AsRef<str>) {
        deliver_chat(self.host, &self.config.chat, line.as_ref());
    }

    /// Queue a reply behind the rate limiter.
    pub fn enqueue(&mut self, command: Command) -> Result<(), HandlerError> {
        let message = OutboundMessage::encode(&command)?;
        self.queue.enqueue(message)?;
        Ok(())
    }

    /// Send a reply ahead of the queue, without spending tokens.
    pub fn send_now(&mut self, command: Command) -> Result<(), HandlerError> {
        let message = OutboundMessage::encode(&command)?;
        self.urgent.push(message);
        Ok(())
    }

    /// Push the current roster to the host.
    pub fn refresh_roster(&mut self) {
        let users = self
            .session
            .channel()
            .map(|channel| channel.users())
            .unwrap_or_default();
        debug!(users = users.len(), "Roster changed");
        self.host.refresh_user_list(&users);
    }
}

/// What the driver should do after a message was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// Tear the connection down with this reason.
    Disconnect(String),
}

/// Errors that can occur while handling a server message.
///
/// None of these end the connection; the registry logs them and moves on.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,
    #[error("reply dropped: {0}")]
    QueueFull(#[from] EnqueueError),
    #[error("reply not encodable: {0}")]
    Encode(#[from] ProtocolError),
}

impl HandlerError {
    /// Short label for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams => "need_more_params",
            Self::QueueFull(_) => "queue_full",
            Self::Encode(e) => e.error_code(),
        }
    }
}

/// Result type for server-message handlers.
pub type HandlerResult = Result<Outcome, HandlerError>;

/// Trait implemented by all server-message handlers.
pub trait Handler {
    /// Handle one parsed server message.
    fn handle(&self, ctx: &mut Context<'_>, msg: &ServerMessage) -> HandlerResult;
}

/// The first middle parameter, or the trailing text when there is none.
///
/// Servers differ on whether JOIN and PART carry the channel as a middle
/// parameter or as the trailing text.
pub fn target_or_trailing(msg: &ServerMessage) -> &str {
    msg.param(0).unwrap_or(msg.trailing.as_str())
}
