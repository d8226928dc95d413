//! Connection-level handlers.
//!
//! Handles NICK, QUIT, KILL, PING and ERROR.

use tickirc_proto::{Command, ServerMessage};
use tracing::{debug, info, trace};

use super::core::{Context, Handler, HandlerError, HandlerResult, Outcome, target_or_trailing};

/// Someone (possibly us) changed nickname.
pub struct NickHandler;

impl Handler for NickHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &ServerMessage) -> HandlerResult {
        let old = msg.source_nick();
        let new = if msg.trailing.is_empty() {
            msg.param(0).unwrap_or_default()
        } else {
            msg.trailing.as_str()
        };
        if old.is_empty() || new.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }

        let mut changed = false;
        if let Some(channel) = ctx.session.channel_mut()
            && let Some(prefix) = channel.user_prefix(old)
        {
            changed = channel.rename_user(old, new, prefix);
        }

        if ctx.session.is_me(old) {
            info!(old, new, "Nickname changed");
            ctx.session.set_nickname(new);
            ctx.host.nickname_changed(new);
        }

        ctx.chat(format!("{old} is now known as {new}"));
        if changed {
            ctx.refresh_roster();
        }
        Ok(Outcome::Continue)
    }
}

/// A user left the network.
pub struct QuitHandler;

impl Handler for QuitHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &ServerMessage) -> HandlerResult {
        let nick = msg.source_nick();
        ctx.chat(format!("Quits: {nick} ({})", msg.trailing));

        let removed = ctx
            .session
            .channel_mut()
            .is_some_and(|channel| channel.remove_user(nick));
        if removed {
            ctx.refresh_roster();
        }
        Ok(Outcome::Continue)
    }
}

/// An operator removed a user from the network.
pub struct KillHandler;

impl Handler for KillHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &ServerMessage) -> HandlerResult {
        let victim = msg.param(0).ok_or(HandlerError::NeedMoreParams)?;
        let nick = msg.source_nick();
        ctx.chat(format!("Killed: {victim} by {nick} ({})", msg.trailing));

        let removed = ctx
            .session
            .channel_mut()
            .is_some_and(|channel| channel.remove_user(victim));
        if removed {
            ctx.refresh_roster();
        }
        Ok(Outcome::Continue)
    }
}

/// Server keepalive. Answered immediately, outside the rate limiter.
pub struct PingHandler;

impl Handler for PingHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &ServerMessage) -> HandlerResult {
        let token = if msg.trailing.is_empty() {
            target_or_trailing(msg)
        } else {
            msg.trailing.as_str()
        };
        trace!(token, "PING");
        ctx.session.record_ping(ctx.now);
        ctx.send_now(Command::Pong(token.to_string()))?;
        Ok(Outcome::Continue)
    }
}

/// The server is closing the link.
pub struct ErrorHandler;

impl Handler for ErrorHandler {
    fn handle(&self, _ctx: &mut Context<'_>, msg: &ServerMessage) -> HandlerResult {
        let reason = if msg.trailing.is_empty() {
            "server error".to_string()
        } else {
            msg.trailing.clone()
        };
        debug!(reason = %reason, "Server sent ERROR");
        Ok(Outcome::Disconnect(reason))
    }
}
