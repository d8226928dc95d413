//! # tickirc-proto
//!
//! Wire-level building blocks for the tickirc embedded IRC client.
//!
//! ## Features
//!
//! - CRLF line framing over a growable receive buffer with an explicit
//!   maximum line length
//! - Decomposition of server lines into prefix, command, params and trailing
//! - Numeric reply table and classification helpers
//! - CTCP parsing and reply construction
//! - Outbound command serialization with sanitization
//!
//! The client drives everything synchronously: [`IrcCodec`] implements the
//! `tokio_util` codec traits, but they are plain functions over a
//! [`bytes::BytesMut`] and need no runtime.

//! ## Quick Start
//!
//! ```rust
//! use tickirc_proto::{CommandId, ServerMessage};
//!
//! let msg: ServerMessage = ":nick!user@host PRIVMSG #chan :hello world".parse().unwrap();
//! assert_eq!(msg.prefix, "nick!user@host");
//! assert_eq!(msg.command, CommandId::Name("PRIVMSG".to_string()));
//! assert_eq!(msg.params, "#chan");
//! assert_eq!(msg.trailing, "hello world");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod chan;
pub mod command;
pub mod ctcp;
pub mod error;
pub mod format;
pub mod irc;
pub mod line;
pub mod message;
pub mod nick;
pub mod response;

pub use self::chan::ChannelExt;
pub use self::command::Command;
pub use self::ctcp::{Ctcp, CtcpKind, CTCP_DELIM};
pub use self::error::{MessageParseError, ProtocolError};
pub use self::format::strip_formatting;
pub use self::irc::IrcCodec;
pub use self::line::{LineCodec, MAX_IRC_LINE_LEN};
pub use self::message::{strip_first_token, tokens, CommandId, ServerMessage};
pub use self::nick::{parse_name, NickPrefix};
pub use self::response::Response;
