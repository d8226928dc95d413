//! Numeric reply handler.
//!
//! Most numerics only produce a chat line. NAMES and TOPIC replies update
//! the joined channel, and nickname errors are reported to the host.

use std::fs;

use tickirc_proto::{Response, ServerMessage, parse_name, tokens};
use tracing::{debug, trace};

use super::core::{Context, Handler, HandlerResult, Outcome};

pub struct NumericHandler;

impl Handler for NumericHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &ServerMessage) -> HandlerResult {
        let Some(code) = msg.numeric() else {
            return Ok(Outcome::Continue);
        };

        let Some(response) = Response::from_u16(code) else {
            if Response::is_error_code(code) {
                ctx.chat(error_line(msg));
            } else {
                show_trailing(ctx, msg);
            }
            return Ok(Outcome::Continue);
        };

        match response {
            Response::RPL_WELCOME
            | Response::RPL_YOURHOST
            | Response::RPL_CREATED
            | Response::RPL_MYINFO
            | Response::RPL_HELLO
            | Response::RPL_MOTDSTART
            | Response::RPL_MOTD => ctx.chat(&msg.trailing),

            Response::RPL_ENDOFMOTD => {
                ctx.chat(&msg.trailing);
                append_local_motd(ctx);
            }

            Response::RPL_ISUPPORT
            | Response::RPL_LUSERCLIENT
            | Response::RPL_LUSEROP
            | Response::RPL_LUSERUNKNOWN
            | Response::RPL_LUSERCHANNELS
            | Response::RPL_LUSERME
            | Response::RPL_LOCALUSERS
            | Response::RPL_GLOBALUSERS
            | Response::RPL_ENDOFWHO
            | Response::RPL_WHOISCHANNELS
            | Response::RPL_WHOISOPERATOR
            | Response::RPL_ENDOFWHOIS
            | Response::RPL_ENDOFWHOWAS => ctx.chat(rest_and_trailing(msg)),

            Response::RPL_NAMREPLY => names_reply(ctx, msg),
            Response::RPL_ENDOFNAMES => {
                trace!(channel = msg.param(1), "End of NAMES");
            }

            Response::RPL_TOPIC => {
                let name = msg.param(1).unwrap_or_default();
                if let Some(channel) = ctx.session.channel_named(name) {
                    channel.set_topic(msg.trailing.as_str());
                }
                ctx.chat(format!("{name} | Topic is: \"{}\"", msg.trailing));
            }
            Response::RPL_NOTOPIC => {
                let name = msg.param(1).unwrap_or_default();
                if let Some(channel) = ctx.session.channel_named(name) {
                    channel.set_topic("");
                }
                ctx.chat(format!("{name} | No topic is set"));
            }

            Response::RPL_WHOISUSER => {
                let [nick, user, host] = fields(msg);
                ctx.chat(format!("{nick} is {user}@{host} : {}", msg.trailing));
            }
            Response::RPL_WHOWASUSER => {
                let [nick, user, host] = fields(msg);
                ctx.chat(format!("{nick} was {user}@{host} : {}", msg.trailing));
            }
            Response::RPL_WHOISSERVER => {
                let [nick, server, _] = fields(msg);
                ctx.chat(format!("{nick} using {server} : {}", msg.trailing));
            }
            Response::RPL_WHOISIDLE => {
                let [nick, idle, _] = fields(msg);
                ctx.chat(format!("{nick} is {idle} {}", msg.trailing));
            }
            Response::RPL_WHOISACCOUNT => {
                let [nick, account, _] = fields(msg);
                ctx.chat(format!("{nick} {} {account}", msg.trailing));
            }
            Response::RPL_WHOREPLY => {
                ctx.chat(format!("{} : {}", msg.params_after_first(), msg.trailing));
            }

            r if r.is_error() => {
                ctx.chat(error_line(msg));
                if r.is_nickname_error() {
                    debug!(code, text = %msg.trailing, "Nickname rejected");
                    ctx.host.nickname_rejected(&msg.trailing);
                }
            }

            _ => show_trailing(ctx, msg),
        }
        Ok(Outcome::Continue)
    }
}

/// The three middle parameters after our own nickname.
fn fields(msg: &ServerMessage) -> [&str; 3] {
    let mut it = msg.param_tokens().skip(1);
    [
        it.next().unwrap_or_default(),
        it.next().unwrap_or_default(),
        it.next().unwrap_or_default(),
    ]
}

/// Middle parameters without our leading nickname, then the trailing text.
fn rest_and_trailing(msg: &ServerMessage) -> String {
    let rest = msg.params_after_first();
    match (rest.is_empty(), msg.trailing.is_empty()) {
        (true, _) => msg.trailing.clone(),
        (false, true) => rest.to_string(),
        (false, false) => format!("{rest} {}", msg.trailing),
    }
}

fn error_line(msg: &ServerMessage) -> String {
    format!("{} : {}", msg.params, msg.trailing)
}

fn show_trailing(ctx: &mut Context<'_>, msg: &ServerMessage) {
    if msg.trailing.is_empty() {
        trace!(command = %msg.command, params = %msg.params, "Numeric without text");
    } else {
        ctx.chat(&msg.trailing);
    }
}

/// Merge a 353 reply into the roster. Params are `me <type> <channel>`.
fn names_reply(ctx: &mut Context<'_>, msg: &ServerMessage) {
    let name = msg.param_tokens().last().unwrap_or_default();
    let Some(channel) = ctx.session.channel_named(name) else {
        debug!(channel = name, "NAMES for a channel we are not in");
        return;
    };

    let mut changed = false;
    for token in tokens(&msg.trailing) {
        let (prefix, nick) = parse_name(token);
        changed |= channel.set_user_prefix(prefix, nick);
    }
    if changed {
        ctx.refresh_roster();
    }
}

fn append_local_motd(ctx: &mut Context<'_>) {
    let Some(path) = ctx.config.chat.motd_file.as_deref() else {
        return;
    };
    match fs::read_to_string(path) {
        Ok(text) => {
            for line in text.lines() {
                ctx.chat(line);
            }
        }
        Err(e) => debug!(path = %path.display(), error = %e, "Local MOTD unreadable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_and_trailing() {
        let msg = ServerMessage::parse(":srv 005 me CHANTYPES=# NICKLEN=30 :are supported").unwrap();
        assert_eq!(rest_and_trailing(&msg), "CHANTYPES=# NICKLEN=30 are supported");
        let msg = ServerMessage::parse(":srv 251 me :There are 3 users").unwrap();
        assert_eq!(rest_and_trailing(&msg), "There are 3 users");
    }

    #[test]
    fn test_fields() {
        let msg = ServerMessage::parse(":srv 311 me alice al host.example * :Alice A").unwrap();
        assert_eq!(fields(&msg), ["alice", "al", "host.example"]);
        let msg = ServerMessage::parse(":srv 311 me").unwrap();
        assert_eq!(fields(&msg), ["", "", ""]);
    }
}
