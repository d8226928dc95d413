//! Messaging handlers.
//!
//! Handles PRIVMSG and NOTICE. A PRIVMSG body is a CTCP request, a game
//! invite or plain chat, tried in that order.

use tickirc_proto::{Ctcp, ServerMessage};

use super::core::{Context, Handler, HandlerError, HandlerResult, Outcome};
use super::{ctcp, invite};

pub struct PrivmsgHandler;

impl Handler for PrivmsgHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &ServerMessage) -> HandlerResult {
        let target = msg.param(0).ok_or(HandlerError::NeedMoreParams)?;
        let sender = msg.source_nick();
        let body = msg.trailing.as_str();

        if let Some(request) = Ctcp::parse(body) {
            return ctcp::handle(ctx, sender, request);
        }
        if invite::is_invite(body) {
            return invite::handle(ctx, sender, body);
        }

        ctx.chat(format!("<{sender}> {body}"));

        let private = !ctx.session.is_our_channel(target);
        if private || mentions(body, ctx.session.nickname()) {
            ctx.host.play_notification_sound();
        }
        Ok(Outcome::Continue)
    }
}

pub struct NoticeHandler;

impl Handler for NoticeHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &ServerMessage) -> HandlerResult {
        ctx.chat(&msg.trailing);
        Ok(Outcome::Continue)
    }
}

/// Whether `body` contains `nickname`, ignoring ASCII case.
fn mentions(body: &str, nickname: &str) -> bool {
    !nickname.is_empty()
        && body
            .to_ascii_lowercase()
            .contains(&nickname.to_ascii_lowercase())
}
