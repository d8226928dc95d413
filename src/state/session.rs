//! Per-connection session state.

use std::time::Instant;

use tickirc_proto::ChannelExt;

use super::channel::Channel;
use crate::error::ClientError;

/// Everything the client knows about its own presence on the network.
#[derive(Debug, Clone)]
pub struct Session {
    nickname: String,
    channel: Option<Channel>,
    last_ping: Option<Instant>,
}

impl Session {
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            channel: None,
            last_ping: None,
        }
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
    }

    /// Whether `nick` is us. Nicknames compare case-insensitively.
    pub fn is_me(&self, nick: &str) -> bool {
        self.nickname.eq_ignore_ascii_case(nick)
    }

    pub fn channel(&self) -> Option<&Channel> {
        self.channel.as_ref()
    }

    pub fn channel_mut(&mut self) -> Option<&mut Channel> {
        self.channel.as_mut()
    }

    /// The joined channel if it is called `name`.
    pub fn channel_named(&mut self, name: &str) -> Option<&mut Channel> {
        self.channel.as_mut().filter(|c| c.is_named(name))
    }

    /// Whether `target` is the joined channel.
    pub fn is_our_channel(&self, target: &str) -> bool {
        self.channel.as_ref().is_some_and(|c| c.is_named(target))
    }

    /// Create the channel locally. Only one channel can be joined at a time.
    pub fn join(&mut self, name: &str, key: Option<String>) -> Result<&mut Channel, ClientError> {
        if !name.is_channel_name() {
            return Err(ClientError::InvalidChannel(name.to_string()));
        }
        if let Some(current) = &self.channel {
            return Err(ClientError::AlreadyInChannel(current.name().to_string()));
        }
        Ok(self.channel.insert(Channel::new(name, key)))
    }

    /// Destroy the channel called `name`.
    pub fn part(&mut self, name: &str) -> Result<Channel, ClientError> {
        match self.channel.take_if(|c| c.is_named(name)) {
            Some(channel) => Ok(channel),
            None => Err(ClientError::NotInChannel(name.to_string())),
        }
    }

    /// Drop whatever channel is joined.
    pub fn leave(&mut self) -> Option<Channel> {
        self.channel.take()
    }

    pub fn last_ping(&self) -> Option<Instant> {
        self.last_ping
    }

    pub fn record_ping(&mut self, at: Instant) {
        self.last_ping = Some(at);
    }

    /// Forget all connection-scoped state and go back to `nickname`.
    pub fn reset(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
        self.channel = None;
        self.last_ping = None;
    }
}
