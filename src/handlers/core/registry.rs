//! Handler registry: maps command names to handlers.

use std::collections::HashMap;

use tickirc_proto::{ChannelExt, CommandId, ServerMessage};
use tracing::{debug, trace};

use super::context::{Context, Handler, HandlerResult, Outcome};
use crate::handlers::{
    channel::{JoinHandler, KickHandler, ModeHandler, PartHandler, TopicHandler},
    connection::{ErrorHandler, KillHandler, NickHandler, PingHandler, QuitHandler},
    messaging::{NoticeHandler, PrivmsgHandler},
    numeric::NumericHandler,
};
use crate::telemetry::{CommandTimer, spans};

pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
    numeric: NumericHandler,
}

impl Registry {
    /// Create a registry with every server-message handler registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        // Connection
        handlers.insert("NICK", Box::new(NickHandler));
        handlers.insert("QUIT", Box::new(QuitHandler));
        handlers.insert("KILL", Box::new(KillHandler));
        handlers.insert("PING", Box::new(PingHandler));
        handlers.insert("ERROR", Box::new(ErrorHandler));

        // Channel
        handlers.insert("JOIN", Box::new(JoinHandler));
        handlers.insert("PART", Box::new(PartHandler));
        handlers.insert("KICK", Box::new(KickHandler));
        handlers.insert("TOPIC", Box::new(TopicHandler));
        handlers.insert("MODE", Box::new(ModeHandler));

        // Messaging
        handlers.insert("PRIVMSG", Box::new(PrivmsgHandler));
        handlers.insert("NOTICE", Box::new(NoticeHandler));

        Self {
            handlers,
            numeric: NumericHandler,
        }
    }

    /// Whether a textual command has a dedicated handler.
    pub fn handles(&self, command: &str) -> bool {
        self.handlers
            .contains_key(command.to_ascii_uppercase().as_str())
    }

    /// Dispatch a message to its handler.
    ///
    /// Handler errors are logged and swallowed; only the returned
    /// [`Outcome`] can end the connection.
    pub fn dispatch(&self, ctx: &mut Context<'_>, msg: &ServerMessage) -> Outcome {
        let cmd_name = match &msg.command {
            CommandId::Numeric(code) => format!("{code:03}"),
            CommandId::Name(name) => name.to_ascii_uppercase(),
        };

        let target = msg.param(0).filter(|p| p.is_channel_name());
        let span = spans::command(&cmd_name, msg.source_nick(), target);
        let _enter = span.enter();
        let _timer = CommandTimer::new(cmd_name.as_str());

        let result: HandlerResult = match &msg.command {
            CommandId::Numeric(_) => self.numeric.handle(ctx, msg),
            CommandId::Name(_) => match self.handlers.get(cmd_name.as_str()) {
                Some(handler) => handler.handle(ctx, msg),
                None => {
                    trace!(command = %cmd_name, "No handler, showing trailing text");
                    ctx.chat(&msg.trailing);
                    Ok(Outcome::Continue)
                }
            },
        };

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(command = %cmd_name, error = %e, code = e.error_code(), "Command error");
                Outcome::Continue
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_commands() {
        let registry = Registry::new();
        for cmd in [
            "NICK", "QUIT", "KILL", "PING", "ERROR", "JOIN", "PART", "KICK", "TOPIC", "MODE",
            "PRIVMSG", "NOTICE",
        ] {
            assert!(registry.handles(cmd), "{cmd} should be registered");
        }
        assert!(registry.handles("privmsg"));
        assert!(!registry.handles("WALLOPS"));
    }
}
