//! The embedding application's side of the client.
//!
//! The client never draws or plays anything itself. It reports chat output,
//! roster changes and notable events through [`Host`]; the embedding
//! application decides what to do with them.

use std::borrow::Cow;
use std::collections::VecDeque;

use tickirc_proto::strip_formatting;
use tracing::info;

use crate::config::ChatConfig;
use crate::state::ChannelUser;

/// Callbacks from the client into the embedding application.
pub trait Host {
    /// A line of chat output.
    fn append_chat_line(&mut self, text: &str);

    /// The roster changed. `users` is in display order.
    fn refresh_user_list(&mut self, users: &[ChannelUser]);

    /// A private message or a mention of our nickname arrived.
    fn play_notification_sound(&mut self);

    /// The server accepted a new nickname for us.
    fn nickname_changed(&mut self, _nickname: &str) {}

    /// The server refused our nickname; `text` is the server's explanation.
    fn nickname_rejected(&mut self, _text: &str) {}

    /// Another player invited us to a game server.
    fn game_invite(&mut self, _host: &str, _port: u16) {}

    /// The connection ended.
    fn disconnected(&mut self, _reason: &str) {}
}

/// Hand a chat line to the host, applying the chat settings.
pub(crate) fn deliver_chat(host: &mut dyn Host, config: &ChatConfig, line: &str) {
    let line = if config.strip_formatting {
        strip_formatting(line)
    } else {
        Cow::Borrowed(line)
    };
    if config.log_console {
        info!(target: "tickirc::chat", "{line}");
    }
    host.append_chat_line(&line);
}

/// Bounded chat history.
///
/// Holds whole lines up to `capacity` bytes (one byte per line counted for
/// the separator) and drops the oldest lines to make room. The newest line
/// is always kept, even when it alone exceeds the capacity.
#[derive(Debug, Clone)]
pub struct ChatLog {
    lines: VecDeque<String>,
    bytes: usize,
    capacity: usize,
}

impl ChatLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            bytes: 0,
            capacity,
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.bytes += line.len() + 1;
        self.lines.push_back(line);

        while self.bytes > self.capacity && self.lines.len() > 1 {
            if let Some(old) = self.lines.pop_front() {
                self.bytes -= old.len() + 1;
            }
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// All lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines().collect::<Vec<_>>().join("\n")
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Bytes in use, separators included.
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.bytes = 0;
    }
}
