//! Core configuration types and loading.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server to connect to.
    pub server: ServerConfig,
    /// Who we are on the network.
    pub identity: IdentityConfig,
    /// Outbound flood control.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Chat output handling.
    #[serde(default)]
    pub chat: ChatConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Configuration for `nickname` on `host:port` with every other setting
    /// at its default.
    pub fn new(host: impl Into<String>, port: u16, nickname: impl Into<String>) -> Self {
        Self {
            server: ServerConfig {
                host: host.into(),
                port,
                password: None,
                channel: None,
                channel_key: None,
            },
            identity: IdentityConfig {
                nickname: nickname.into(),
                username: None,
                realname: None,
                invisible: true,
                version: default_version(),
            },
            rate_limit: RateLimitConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

/// Server connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host name or address (e.g., "irc.freenode.net").
    pub host: String,
    /// TCP port (default: 6667).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connection password sent as PASS before registration.
    #[serde(default)]
    pub password: Option<String>,
    /// Channel joined after connecting, if any.
    #[serde(default)]
    pub channel: Option<String>,
    /// Key for `channel`.
    #[serde(default)]
    pub channel_key: Option<String>,
}

/// Registration identity.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Initial nickname.
    pub nickname: String,
    /// Username for USER (defaults to the nickname).
    #[serde(default)]
    pub username: Option<String>,
    /// Real name for USER (defaults to the username).
    #[serde(default)]
    pub realname: Option<String>,
    /// Ask for user mode +i at registration.
    #[serde(default = "default_true")]
    pub invisible: bool,
    /// Version string for CTCP VERSION replies and game invites.
    #[serde(default = "default_version")]
    pub version: String,
}

impl IdentityConfig {
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.nickname)
    }

    pub fn realname(&self) -> &str {
        self.realname.as_deref().unwrap_or_else(|| self.username())
    }
}

/// Outbound token bucket settings.
///
/// Tokens are bytes: a message of N bytes costs N tokens. The bucket holds
/// at most `burst_bytes` tokens and gains `refill_rate` per second.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum number of queued messages (default: 100).
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
    /// Maximum number of queued bytes (default: 2500).
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    /// Token bucket capacity in bytes (default: 250).
    #[serde(default = "default_burst_bytes")]
    pub burst_bytes: usize,
    /// Tokens added per second (default: 10).
    #[serde(default = "default_refill_rate")]
    pub refill_rate: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
            max_bytes: default_max_bytes(),
            burst_bytes: default_burst_bytes(),
            refill_rate: default_refill_rate(),
        }
    }
}

/// Chat output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Also emit chat lines through tracing at info level.
    #[serde(default)]
    pub log_console: bool,
    /// Remove color and formatting codes before lines reach the host.
    #[serde(default = "default_true")]
    pub strip_formatting: bool,
    /// Local file appended after the server's end-of-MOTD.
    #[serde(default)]
    pub motd_file: Option<PathBuf>,
    /// Byte capacity of the chat history buffer (default: 4096).
    #[serde(default = "default_history_bytes")]
    pub history_bytes: usize,
    /// Maximum inbound line length including CRLF (default: 512).
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            log_console: false,
            strip_formatting: true,
            motd_file: None,
            history_bytes: default_history_bytes(),
            max_line_len: default_max_line_len(),
        }
    }
}
