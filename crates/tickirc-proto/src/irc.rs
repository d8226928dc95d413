//! IRC message codec.
//!
//! [`IrcCodec`] turns raw receive-buffer bytes into [`ServerMessage`]s and
//! [`Command`]s into wire bytes. It implements the `tokio_util` codec traits
//! but is driven synchronously by the client.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::command::Command;
use crate::error;
use crate::line::LineCodec;
use crate::message::ServerMessage;

/// Codec for decoding server lines and encoding client commands.
///
/// Wraps [`LineCodec`] and parses lines into [`ServerMessage`]s. Blank lines
/// are skipped.
#[derive(Debug, Clone, Default)]
pub struct IrcCodec {
    inner: LineCodec,
}

impl IrcCodec {
    /// Create a codec with the standard 512 byte line limit.
    pub fn new() -> Self {
        Self {
            inner: LineCodec::new(),
        }
    }

    /// Create a codec with a custom line limit (CRLF included).
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            inner: LineCodec::with_max_len(max_len),
        }
    }

    /// The inbound line limit.
    pub fn max_len(&self) -> usize {
        self.inner.max_len()
    }

    /// Forget partial framing state. Call when the receive buffer is cleared.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Sanitize an outgoing line.
    ///
    /// - Truncates at the first line ending and re-terminates with CRLF
    /// - Rejects illegal control characters
    pub fn sanitize(mut data: String) -> error::Result<String> {
        if let Some(pos) = data.find(['\r', '\n']) {
            data.truncate(pos);
        }

        if let Some(ch) = data.chars().find(|&c| crate::format::is_illegal_control_char(c)) {
            return Err(error::ProtocolError::IllegalControlChar(ch));
        }

        data.push_str("\r\n");
        Ok(data)
    }

    /// Serialize a command into a standalone wire payload.
    pub fn encode_command(&mut self, cmd: Command) -> error::Result<Bytes> {
        let mut buf = BytesMut::new();
        self.encode(cmd, &mut buf)?;
        Ok(buf.freeze())
    }
}

impl Decoder for IrcCodec {
    type Item = ServerMessage;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<ServerMessage>> {
        while let Some(line) = self.inner.decode(src)? {
            if line.trim().is_empty() {
                continue;
            }
            return ServerMessage::parse(&line).map(Some);
        }
        Ok(None)
    }
}

impl Encoder<Command> for IrcCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, cmd: Command, dst: &mut BytesMut) -> error::Result<()> {
        let sanitized = Self::sanitize(cmd.to_string())?;
        self.inner.encode(sanitized, dst)
    }
}
