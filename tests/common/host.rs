//! Host implementation that records every callback.

use tickirc::{ChannelUser, Host};

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub lines: Vec<String>,
    pub rosters: Vec<Vec<String>>,
    pub sounds: usize,
    pub nick_changes: Vec<String>,
    pub rejections: Vec<String>,
    pub invites: Vec<(String, u16)>,
    pub disconnects: Vec<String>,
}

#[allow(dead_code)]
impl RecordingHost {
    /// Whether any chat line contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    /// The most recent roster pushed by the client, in display order.
    pub fn last_roster(&self) -> Option<&[String]> {
        self.rosters.last().map(Vec::as_slice)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl Host for RecordingHost {
    fn append_chat_line(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn refresh_user_list(&mut self, users: &[ChannelUser]) {
        self.rosters
            .push(users.iter().map(ToString::to_string).collect());
    }

    fn play_notification_sound(&mut self) {
        self.sounds += 1;
    }

    fn nickname_changed(&mut self, nickname: &str) {
        self.nick_changes.push(nickname.to_string());
    }

    fn nickname_rejected(&mut self, text: &str) {
        self.rejections.push(text.to_string());
    }

    fn game_invite(&mut self, host: &str, port: u16) {
        self.invites.push((host.to_string(), port));
    }

    fn disconnected(&mut self, reason: &str) {
        self.disconnects.push(reason.to_string());
    }
}
