//! Telemetry utilities for command timing and span construction.

use std::time::Instant;

use tracing::trace;

/// Guard for timing how long a server message takes to handle.
///
/// Emits a `trace!` event with the elapsed time when dropped.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let elapsed_us = self.start.elapsed().as_micros() as u64;
        trace!(command = %self.command, elapsed_us, "Command handled");
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Span covering one connection to an IRC server.
    pub fn connection(host: &str, port: u16) -> Span {
        info_span!("connection", host = %host, port = port)
    }

    /// Span for handling one server message.
    pub fn command(name: &str, source: &str, target: Option<&str>) -> Span {
        if let Some(target) = target {
            info_span!("command", name = %name, source = %source, target = %target)
        } else {
            info_span!("command", name = %name, source = %source)
        }
    }
}
