//! Outbound IRC commands.
//!
//! [`Command`] covers everything the client sends. Its `Display`
//! implementation (in `serialize`) produces a complete wire line including
//! the terminating CRLF.
//!
//! # Example
//!
//! ```
//! use tickirc_proto::Command;
//!
//! let cmd = Command::Privmsg("#ufoai".to_string(), "hello all".to_string());
//! assert_eq!(cmd.to_string(), "PRIVMSG #ufoai :hello all\r\n");
//! ```

mod serialize;

/// A command sent by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// `PASS password`
    Pass(String),
    /// `NICK nickname`
    Nick(String),
    /// `USER user mode * :realname`
    User {
        /// Username.
        user: String,
        /// Request user mode `+i` at registration.
        invisible: bool,
        /// Free-form real name.
        realname: String,
    },
    /// `JOIN channel [key]`
    Join {
        /// Channel to join.
        channel: String,
        /// Channel key, if the channel is protected.
        key: Option<String>,
    },
    /// `PART channel`
    Part(String),
    /// `MODE target modes [params]`
    Mode {
        /// Channel or nickname.
        target: String,
        /// Mode string such as `+o`.
        modes: String,
        /// Mode arguments, space-separated.
        params: Option<String>,
    },
    /// `TOPIC channel :topic`
    Topic {
        /// Channel whose topic changes.
        channel: String,
        /// New topic text.
        topic: String,
    },
    /// `PRIVMSG target :text`
    Privmsg(String, String),
    /// `NOTICE target :text`
    Notice(String, String),
    /// `KICK channel nick :reason`
    Kick {
        /// Channel to kick from.
        channel: String,
        /// Nickname to remove.
        nick: String,
        /// Optional reason.
        reason: Option<String>,
    },
    /// `WHO mask`
    Who(String),
    /// `WHOIS nick`
    Whois(String),
    /// `WHOWAS nick`
    Whowas(String),
    /// `QUIT :reason`
    Quit(Option<String>),
    /// `PONG :token`
    Pong(String),
}

impl Command {
    /// The command word, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pass(_) => "PASS",
            Self::Nick(_) => "NICK",
            Self::User { .. } => "USER",
            Self::Join { .. } => "JOIN",
            Self::Part(_) => "PART",
            Self::Mode { .. } => "MODE",
            Self::Topic { .. } => "TOPIC",
            Self::Privmsg(..) => "PRIVMSG",
            Self::Notice(..) => "NOTICE",
            Self::Kick { .. } => "KICK",
            Self::Who(_) => "WHO",
            Self::Whois(_) => "WHOIS",
            Self::Whowas(_) => "WHOWAS",
            Self::Quit(_) => "QUIT",
            Self::Pong(_) => "PONG",
        }
    }
}
