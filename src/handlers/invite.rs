//! Game invites carried in PRIVMSG bodies.
//!
//! Wire form: `GAMEINVITE;<host>;<port>[;<version>]`.

use std::fmt;

use tracing::debug;

use super::core::{Context, HandlerResult, Outcome};

/// Leading tag of an invite body, separator included.
pub const INVITE_TAG: &str = "GAMEINVITE;";

/// An invitation to join a game server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInvite {
    pub host: String,
    pub port: u16,
    /// Version of the inviting application. Absent means "any".
    pub version: Option<String>,
}

impl GameInvite {
    pub fn new(host: impl Into<String>, port: u16, version: Option<String>) -> Self {
        Self {
            host: host.into(),
            port,
            version,
        }
    }

    /// Parse an invite body. `None` when the tag is missing or a field is
    /// malformed.
    pub fn parse(body: &str) -> Option<Self> {
        let rest = body.strip_prefix(INVITE_TAG)?;
        let mut fields = rest.split(';');

        let host = fields.next().filter(|h| !h.is_empty() && !h.contains(' '))?;
        let port = fields.next()?.parse::<u16>().ok().filter(|&p| p != 0)?;
        let version = match fields.next() {
            Some(v) if v.is_empty() => return None,
            Some(v) => Some(v.to_string()),
            None => None,
        };
        if fields.next().is_some() {
            return None;
        }

        Some(Self::new(host, port, version))
    }

    /// Whether we can accept this invite when running `ours`.
    pub fn is_compatible(&self, ours: &str) -> bool {
        self.version.as_deref().is_none_or(|v| v == ours)
    }
}

impl fmt::Display for GameInvite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{INVITE_TAG}{};{}", self.host, self.port)?;
        if let Some(version) = &self.version {
            write!(f, ";{version}")?;
        }
        Ok(())
    }
}

pub(super) fn is_invite(body: &str) -> bool {
    body.starts_with(INVITE_TAG)
}

pub(super) fn handle(ctx: &mut Context<'_>, sender: &str, body: &str) -> HandlerResult {
    let Some(invite) = GameInvite::parse(body) else {
        debug!(from = sender, body, "Dropping malformed game invite");
        return Ok(Outcome::Continue);
    };
    if !invite.is_compatible(&ctx.config.identity.version) {
        debug!(
            from = sender,
            theirs = invite.version.as_deref(),
            ours = %ctx.config.identity.version,
            "Dropping game invite from a different version"
        );
        return Ok(Outcome::Continue);
    }

    ctx.chat(format!(
        "{sender} invites you to a game at {}:{}",
        invite.host, invite.port
    ));
    ctx.host.game_invite(&invite.host, invite.port);
    Ok(Outcome::Continue)
}
