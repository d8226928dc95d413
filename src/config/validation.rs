//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use std::path::PathBuf;
use thiserror::Error;
use tickirc_proto::ChannelExt;

/// Shortest inbound line limit accepted.
const MIN_LINE_LEN: usize = 64;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.host is required")]
    MissingHost,
    #[error("server.port must be non-zero")]
    InvalidPort,
    #[error("server.channel is not a valid channel name: '{0}'")]
    InvalidChannel(String),
    #[error("identity.nickname is required")]
    MissingNickname,
    #[error("identity.nickname contains characters IRC does not allow: '{0}'")]
    InvalidNickname(String),
    #[error("rate_limit.max_messages must be at least 1")]
    ZeroMaxMessages,
    #[error("rate_limit.burst_bytes must be at least 1")]
    ZeroBurst,
    #[error("rate_limit.refill_rate must be a positive number, got {0}")]
    InvalidRefillRate(f64),
    #[error("chat.max_line_len must be at least 64, got {0}")]
    LineLengthTooSmall(usize),
    #[error("chat.motd_file does not exist: {}", .0.display())]
    MotdFileNotFound(PathBuf),
}

fn is_valid_nickname(nick: &str) -> bool {
    let Some(first) = nick.chars().next() else {
        return false;
    };
    if first.is_ascii_digit() || first == '-' {
        return false;
    }
    nick.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '[' | ']' | '\\' | '`' | '^' | '{' | '}' | '|' | '_')
    })
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Server
    if config.server.host.trim().is_empty() {
        errors.push(ValidationError::MissingHost);
    }
    if config.server.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }
    if let Some(ref channel) = config.server.channel
        && !channel.is_channel_name()
    {
        errors.push(ValidationError::InvalidChannel(channel.clone()));
    }

    // Identity
    let nick = &config.identity.nickname;
    if nick.is_empty() {
        errors.push(ValidationError::MissingNickname);
    } else if !is_valid_nickname(nick) {
        errors.push(ValidationError::InvalidNickname(nick.clone()));
    }

    // Rate limiting
    let limits = &config.rate_limit;
    if limits.max_messages == 0 {
        errors.push(ValidationError::ZeroMaxMessages);
    }
    if limits.burst_bytes == 0 {
        errors.push(ValidationError::ZeroBurst);
    }
    if !limits.refill_rate.is_finite() || limits.refill_rate <= 0.0 {
        errors.push(ValidationError::InvalidRefillRate(limits.refill_rate));
    }

    // Chat
    if config.chat.max_line_len < MIN_LINE_LEN {
        errors.push(ValidationError::LineLengthTooSmall(config.chat.max_line_len));
    }
    if let Some(ref motd) = config.chat.motd_file
        && !motd.exists()
    {
        errors.push(ValidationError::MotdFileNotFound(motd.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
