//! CTCP (Client-to-Client Protocol) handling.
//!
//! CTCP requests travel inside PRIVMSG bodies wrapped in `\x01`. Replies go
//! back as NOTICE, except VERSION which this client answers with PRIVMSG.
//!
//! # Example
//!
//! ```
//! use tickirc_proto::ctcp::{Ctcp, CtcpKind};
//!
//! let ctcp = Ctcp::parse("\x01PING 12345\x01").unwrap();
//! assert_eq!(ctcp.kind, CtcpKind::Ping);
//! assert_eq!(ctcp.params, Some("12345"));
//! assert_eq!(ctcp.to_string(), "\x01PING 12345\x01");
//! ```

use std::fmt;

/// The CTCP delimiter character (`\x01`).
pub const CTCP_DELIM: char = '\x01';

/// CTCP request types this client distinguishes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CtcpKind {
    /// VERSION - requests client version information.
    Version,
    /// PING - round-trip probe, echoed back.
    Ping,
    /// TIME - requests local time.
    Time,
    /// Anything else, kept verbatim.
    Unknown(String),
}

impl CtcpKind {
    /// Parse a CTCP command name.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "VERSION" => Self::Version,
            "PING" => Self::Ping,
            "TIME" => Self::Time,
            _ => Self::Unknown(name.to_owned()),
        }
    }

    /// Canonical name of this command.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Version => "VERSION",
            Self::Ping => "PING",
            Self::Time => "TIME",
            Self::Unknown(s) => s,
        }
    }
}

impl fmt::Display for CtcpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed CTCP message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ctcp<'a> {
    /// The CTCP command type.
    pub kind: CtcpKind,
    /// Text following the command, if any.
    pub params: Option<&'a str>,
}

impl<'a> Ctcp<'a> {
    /// Parse a CTCP message from a PRIVMSG/NOTICE body.
    ///
    /// The request starts after the first `\x01` anywhere in the body and
    /// runs to the next one or the end. Returns `None` for bodies without a
    /// delimiter or without a command.
    pub fn parse(text: &'a str) -> Option<Self> {
        let (_, text) = text.split_once(CTCP_DELIM)?;
        let text = text.split(CTCP_DELIM).next().unwrap_or_default();
        if text.is_empty() {
            return None;
        }

        let (command, params) = match text.split_once(' ') {
            Some((cmd, rest)) => (cmd, Some(rest).filter(|p| !p.is_empty())),
            None => (text, None),
        };
        if command.is_empty() {
            return None;
        }

        Some(Self {
            kind: CtcpKind::parse(command),
            params,
        })
    }

    /// Whether a message body is a CTCP request.
    pub fn is_ctcp(text: &str) -> bool {
        text.contains(CTCP_DELIM)
    }

    /// VERSION reply body carrying `version`.
    pub fn version_reply(version: &'a str) -> Self {
        Self {
            kind: CtcpKind::Version,
            params: Some(version),
        }
    }

    /// PING reply body echoing `params`.
    pub fn pong(params: Option<&'a str>) -> Self {
        Self {
            kind: CtcpKind::Unknown("PONG".to_string()),
            params,
        }
    }

    /// TIME reply body: `TIME :<local time>`.
    pub fn time_reply(time: &str) -> String {
        format!("{CTCP_DELIM}TIME :{time}{CTCP_DELIM}")
    }
}

impl fmt::Display for Ctcp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CTCP_DELIM, self.kind)?;
        if let Some(params) = self.params {
            write!(f, " {}", params)?;
        }
        write!(f, "{}", CTCP_DELIM)
    }
}
