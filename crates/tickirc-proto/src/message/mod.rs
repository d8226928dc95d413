//! Inbound IRC message representation.
//!
//! A [`ServerMessage`] owns the four fields of a decomposed server line.
//! Middle parameters are stored joined by a single space; callers walk them
//! with [`ServerMessage::param_tokens`], which borrows instead of splitting
//! destructively.
//!
//! # Example
//!
//! ```
//! use tickirc_proto::ServerMessage;
//!
//! let msg = ServerMessage::parse(":irc.example.net 311 me alice ~a example.org * :Alice").unwrap();
//! let mut tokens = msg.param_tokens();
//! assert_eq!(tokens.next(), Some("me"));
//! assert_eq!(tokens.next(), Some("alice"));
//! assert_eq!(msg.trailing, "Alice");
//! ```

mod nom_parser;

use std::fmt;
use std::str::{FromStr, SplitAsciiWhitespace};

use crate::error::{MessageParseError, ProtocolError};
use crate::response::Response;

/// Lazy iterator over whitespace-delimited slices of a text field.
pub type Tokens<'a> = SplitAsciiWhitespace<'a>;

/// Iterate the whitespace-delimited tokens of `text` without copying.
pub fn tokens(text: &str) -> Tokens<'_> {
    text.split_ascii_whitespace()
}

/// Everything after the first token of `text` and the spaces that follow it.
///
/// Returns an empty string when `text` holds at most one token.
pub fn strip_first_token(text: &str) -> &str {
    let text = text.trim_start_matches(' ');
    match text.find(' ') {
        Some(idx) => text[idx..].trim_start_matches(' '),
        None => "",
    }
}

/// The command of a server line: a three digit numeric reply or a word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandId {
    /// Numeric reply such as `001` or `433`.
    Numeric(u16),
    /// Textual command such as `PRIVMSG`, kept verbatim.
    Name(String),
}

impl CommandId {
    /// The numeric code, if this is a numeric reply.
    pub fn numeric(&self) -> Option<u16> {
        match self {
            Self::Numeric(code) => Some(*code),
            Self::Name(_) => None,
        }
    }

    /// The command word, if this is a textual command.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Numeric(_) => None,
            Self::Name(name) => Some(name),
        }
    }

    /// The known numeric reply, if any.
    pub fn response(&self) -> Option<Response> {
        self.numeric().and_then(Response::from_u16)
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(code) => write!(f, "{:03}", code),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// A decomposed server line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerMessage {
    /// Origin without the leading `:`; empty when absent.
    pub prefix: String,
    /// The command.
    pub command: CommandId,
    /// Middle parameters joined by single spaces.
    pub params: String,
    /// Text after the ` :` marker; empty when absent.
    pub trailing: String,
}

impl ServerMessage {
    /// Parse one line. A trailing CRLF, if any, is ignored.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        Self::try_parse(line).map_err(|cause| ProtocolError::InvalidMessage {
            string: line.to_string(),
            cause,
        })
    }

    /// Parse one line, reporting only the parse error kind.
    pub fn try_parse(line: &str) -> Result<Self, MessageParseError> {
        let parsed = nom_parser::parse_message(line)?;

        let command = if parsed.command.starts_with(|c: char| c.is_ascii_digit()) {
            let code = parsed
                .command
                .parse::<u16>()
                .map_err(|_| MessageParseError::InvalidNumeric(parsed.command.to_string()))?;
            CommandId::Numeric(code)
        } else {
            CommandId::Name(parsed.command.to_string())
        };

        Ok(Self {
            prefix: parsed.prefix.unwrap_or_default().to_string(),
            command,
            params: parsed.params.join(" "),
            trailing: parsed.trailing.unwrap_or_default().to_string(),
        })
    }

    /// Lazy iterator over the middle parameters.
    pub fn param_tokens(&self) -> Tokens<'_> {
        tokens(&self.params)
    }

    /// The `idx`-th middle parameter.
    pub fn param(&self, idx: usize) -> Option<&str> {
        self.param_tokens().nth(idx)
    }

    /// Middle parameters after the first one (usually our own nickname).
    pub fn params_after_first(&self) -> &str {
        strip_first_token(&self.params)
    }

    /// Nickname part of a `nick!user@host` prefix.
    pub fn source_nick(&self) -> &str {
        self.prefix
            .split_once('!')
            .map_or(self.prefix.as_str(), |(nick, _)| nick)
    }

    /// Numeric code of this message, if it is a numeric reply.
    pub fn numeric(&self) -> Option<u16> {
        self.command.numeric()
    }
}

impl FromStr for ServerMessage {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.prefix.is_empty() {
            write!(f, ":{} ", self.prefix)?;
        }
        write!(f, "{}", self.command)?;
        if !self.params.is_empty() {
            write!(f, " {}", self.params)?;
        }
        if !self.trailing.is_empty() {
            write!(f, " :{}", self.trailing)?;
        }
        Ok(())
    }
}
