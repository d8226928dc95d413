//! Replies to CTCP requests received in a PRIVMSG.

use chrono::Local;
use tickirc_proto::{Command, Ctcp, CtcpKind};
use tracing::debug;

use super::core::{Context, HandlerResult, Outcome};

/// `ctime`-style local timestamp, e.g. `Sat Oct 17 14:03:09 2026`.
const TIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

pub(super) fn handle(ctx: &mut Context<'_>, sender: &str, request: Ctcp<'_>) -> HandlerResult {
    if sender.is_empty() {
        debug!(kind = %request.kind, "CTCP request without a sender");
        return Ok(Outcome::Continue);
    }

    match &request.kind {
        CtcpKind::Version => {
            let version = ctx.config.identity.version.clone();
            let reply = Ctcp::version_reply(&version).to_string();
            ctx.enqueue(Command::Privmsg(sender.to_string(), reply))?;
            debug!(to = sender, "Answered CTCP VERSION");
        }
        CtcpKind::Ping => {
            let reply = Ctcp::pong(request.params).to_string();
            ctx.enqueue(Command::Notice(sender.to_string(), reply))?;
        }
        CtcpKind::Time => {
            let now = Local::now().format(TIME_FORMAT).to_string();
            ctx.enqueue(Command::Notice(sender.to_string(), Ctcp::time_reply(&now)))?;
        }
        CtcpKind::Unknown(name) => {
            debug!(ctcp = %name, from = sender, "Ignoring unknown CTCP request");
        }
    }
    Ok(Outcome::Continue)
}
