//! Channel handlers.
//!
//! Handles JOIN, PART, KICK, TOPIC and MODE as seen from the client side:
//! the server tells us what happened and we mirror it into the roster.

use tickirc_proto::{NickPrefix, ServerMessage, tokens};
use tracing::debug;

use super::core::{Context, Handler, HandlerError, HandlerResult, Outcome, target_or_trailing};
use crate::state::Channel;

/// A user joined. A JOIN for ourselves while no channel exists means the
/// server put us somewhere, so the channel is created.
pub struct JoinHandler;

impl Handler for JoinHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &ServerMessage) -> HandlerResult {
        let name = target_or_trailing(msg);
        let nick = msg.source_nick();
        if name.is_empty() || nick.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }

        if !ctx.session.is_our_channel(name) {
            if !ctx.session.is_me(nick) || ctx.session.channel().is_some() {
                debug!(channel = name, nick, "JOIN for a channel we are not in");
                return Ok(Outcome::Continue);
            }
            if let Err(e) = ctx.session.join(name, None) {
                debug!(channel = name, error = %e, "Ignoring forced JOIN");
                return Ok(Outcome::Continue);
            }
        }

        let added = ctx
            .session
            .channel_named(name)
            .is_some_and(|channel| channel.add_user(NickPrefix::None, nick));

        ctx.chat(format!("Joined: {nick}"));
        if added {
            ctx.refresh_roster();
        }
        Ok(Outcome::Continue)
    }
}

/// A user left the channel. Our own PART drops the channel.
pub struct PartHandler;

impl Handler for PartHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &ServerMessage) -> HandlerResult {
        let (name, reason) = match msg.param(0) {
            Some(name) => (name, msg.trailing.as_str()),
            None => (msg.trailing.as_str(), ""),
        };
        let nick = msg.source_nick();
        if name.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }

        let changed = if ctx.session.is_me(nick) {
            ctx.session.is_our_channel(name) && ctx.session.leave().is_some()
        } else {
            ctx.session
                .channel_named(name)
                .is_some_and(|channel| channel.remove_user(nick))
        };

        ctx.chat(format!("Left: {nick} ({reason})"));
        if changed {
            ctx.refresh_roster();
        }
        Ok(Outcome::Continue)
    }
}

/// A user was kicked. Being kicked ourselves drops the channel.
pub struct KickHandler;

impl Handler for KickHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &ServerMessage) -> HandlerResult {
        let name = msg.param(0).ok_or(HandlerError::NeedMoreParams)?;
        let victim = msg.param(1).ok_or(HandlerError::NeedMoreParams)?;
        let nick = msg.source_nick();
        let reason = msg.trailing.as_str();

        let changed = if ctx.session.is_me(victim) {
            ctx.chat(format!("You were kicked from {name} by {nick} ({reason})"));
            ctx.session.is_our_channel(name) && ctx.session.leave().is_some()
        } else {
            ctx.chat(format!("{nick} kicked {victim} ({reason})"));
            ctx.session
                .channel_named(name)
                .is_some_and(|channel| channel.remove_user(victim))
        };

        if changed {
            ctx.refresh_roster();
        }
        Ok(Outcome::Continue)
    }
}

/// Someone changed the channel topic.
pub struct TopicHandler;

impl Handler for TopicHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &ServerMessage) -> HandlerResult {
        let name = msg.param(0).ok_or(HandlerError::NeedMoreParams)?;
        let nick = msg.source_nick();

        if let Some(channel) = ctx.session.channel_named(name) {
            channel.set_topic(msg.trailing.as_str());
        }
        ctx.chat(format!("{nick} changed the topic to: {}", msg.trailing));
        Ok(Outcome::Continue)
    }
}

/// Mode change on a channel or user. Operator and voice changes on our
/// channel are mirrored into the roster.
pub struct ModeHandler;

impl Handler for ModeHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &ServerMessage) -> HandlerResult {
        let nick = msg.source_nick();
        if msg.trailing.is_empty() {
            ctx.chat(format!("{nick} sets mode {}", msg.params));
        } else {
            ctx.chat(format!("{nick} sets mode {} {}", msg.params, msg.trailing));
        }

        let Some(target) = msg.param(0) else {
            return Err(HandlerError::NeedMoreParams);
        };
        let Some(modes) = msg.param(1).or_else(|| tokens(&msg.trailing).next()) else {
            return Ok(Outcome::Continue);
        };
        // With the mode string in the trailing text, its arguments follow it there
        let args: Vec<&str> = if msg.param(1).is_some() {
            msg.param_tokens().skip(2).chain(tokens(&msg.trailing)).collect()
        } else {
            tokens(&msg.trailing).skip(1).collect()
        };

        let changed = ctx
            .session
            .channel_named(target)
            .is_some_and(|channel| apply_membership_modes(channel, modes, &args));
        if changed {
            ctx.refresh_roster();
        }
        Ok(Outcome::Continue)
    }
}

/// Apply `+o`/`-o`/`+v`/`-v` from a channel mode string. Other modes only
/// matter for how many arguments they consume.
fn apply_membership_modes(channel: &mut Channel, modes: &str, args: &[&str]) -> bool {
    let mut args = args.iter().copied();
    let mut adding = true;
    let mut changed = false;

    for mode in modes.chars() {
        match mode {
            '+' => adding = true,
            '-' => adding = false,
            'o' | 'v' => {
                let Some(nick) = args.next() else { break };
                let Some(current) = channel.user_prefix(nick) else {
                    continue;
                };
                let granted = if mode == 'o' {
                    NickPrefix::Operator
                } else {
                    NickPrefix::Voice
                };
                let prefix = match (adding, current) {
                    // Voice does not demote an operator
                    (true, NickPrefix::Operator) if granted == NickPrefix::Voice => current,
                    (true, _) => granted,
                    (false, p) if p == granted => NickPrefix::None,
                    (false, p) => p,
                };
                changed |= channel.set_user_prefix(prefix, nick);
            }
            'b' | 'k' | 'e' | 'I' => {
                args.next();
            }
            'l' if adding => {
                args.next();
            }
            _ => {}
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> Channel {
        let mut channel = Channel::new("#ufo", None);
        channel.add_user(NickPrefix::None, "alice");
        channel.add_user(NickPrefix::Operator, "bob");
        channel
    }

    #[test]
    fn test_op_and_deop() {
        let mut ch = channel();
        assert!(apply_membership_modes(&mut ch, "+o-o", &["alice", "bob"]));
        assert_eq!(ch.user_prefix("alice"), Some(NickPrefix::Operator));
        assert_eq!(ch.user_prefix("bob"), Some(NickPrefix::None));
    }

    #[test]
    fn test_voice_keeps_operator() {
        let mut ch = channel();
        assert!(!apply_membership_modes(&mut ch, "+v", &["bob"]));
        assert_eq!(ch.user_prefix("bob"), Some(NickPrefix::Operator));
        assert!(!apply_membership_modes(&mut ch, "-v", &["bob"]));
    }

    #[test]
    fn test_argument_consumption() {
        let mut ch = channel();
        // +b and +l eat arguments, -l does not
        assert!(apply_membership_modes(
            &mut ch,
            "+bl-l+v",
            &["*!*@spam", "10", "alice"]
        ));
        assert_eq!(ch.user_prefix("alice"), Some(NickPrefix::Voice));
    }

    #[test]
    fn test_unknown_nick_ignored() {
        let mut ch = channel();
        assert!(!apply_membership_modes(&mut ch, "+o", &["mallory"]));
        assert!(!ch.contains("mallory"));
        assert!(!apply_membership_modes(&mut ch, "+o", &[]));
    }
}
