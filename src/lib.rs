//! tickirc - an embeddable, poll-driven IRC chat client.
//!
//! The client talks to one IRC server, keeps at most one joined channel
//! with its roster, and reports everything through the [`Host`] trait.
//! Outbound traffic passes a byte-based token bucket so a chatty user
//! cannot flood the server.
//!
//! ```no_run
//! use tickirc::{ChannelUser, Client, Config, Host, TcpTransport};
//!
//! struct Printer;
//!
//! impl Host for Printer {
//!     fn append_chat_line(&mut self, text: &str) {
//!         println!("{text}");
//!     }
//!     fn refresh_user_list(&mut self, _users: &[ChannelUser]) {}
//!     fn play_notification_sound(&mut self) {}
//! }
//!
//! let config = Config::new("irc.example.net", 6667, "commander");
//! let mut client = Client::new(config, TcpTransport::new(), Printer);
//! client.connect("irc.example.net", 6667)?;
//! client.join("#ufo", None)?;
//! loop {
//!     client.tick()?;
//!     std::thread::sleep(std::time::Duration::from_millis(50));
//! }
//! # Ok::<(), tickirc::ClientError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod host;
pub mod network;
pub mod state;
pub mod telemetry;

pub use client::Client;
pub use config::{Config, ConfigError, ValidationError};
pub use error::{ClientError, Result};
pub use handlers::GameInvite;
pub use host::{ChatLog, Host};
pub use network::{MemoryTransport, SendQueue, TcpTransport, Transport};
pub use state::{Channel, ChannelUser, ConnectionState, Session};
