//! CRLF line framing.
//!
//! [`LineCodec`] extracts complete lines from a growable receive buffer. It
//! enforces an explicit maximum line length: an over-length line is reported
//! once and its bytes are dropped, after which framing continues with the
//! next line.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error;

/// Maximum IRC line length in bytes, CRLF included.
pub const MAX_IRC_LINE_LEN: usize = 512;

/// Line codec for CRLF-terminated messages.
#[derive(Debug, Clone)]
pub struct LineCodec {
    /// Index of the next byte to scan for CRLF
    next_index: usize,
    /// Maximum line length, CRLF included
    max_len: usize,
    /// Dropping the tail of an over-length line
    discarding: bool,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCodec {
    /// Create a codec with the standard 512 byte limit.
    pub fn new() -> Self {
        Self::with_max_len(MAX_IRC_LINE_LEN)
    }

    /// Create a codec with a custom line limit.
    ///
    /// Limits below 3 bytes are raised to 3 so a one-byte line fits.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len: max_len.max(3),
            discarding: false,
        }
    }

    /// The configured line limit.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Forget any partial scan state. Call after clearing the buffer.
    pub fn reset(&mut self) {
        self.next_index = 0;
        self.discarding = false;
    }

    fn find_crlf(buf: &[u8], from: usize) -> Option<usize> {
        buf.get(from..)?
            .windows(2)
            .position(|w| w == b"\r\n")
            .map(|pos| pos + from)
    }

    /// Drop everything buffered except a lone trailing `\r`, which may
    /// still pair with the next `\n`.
    fn drop_partial(&mut self, src: &mut BytesMut) {
        let keep = usize::from(src.last() == Some(&b'\r'));
        src.advance(src.len() - keep);
        self.next_index = src.len();
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        loop {
            // Step back one byte so a CR left at the end of the last scan is seen
            let start = self.next_index.saturating_sub(1);

            let Some(pos) = Self::find_crlf(src, start) else {
                if self.discarding {
                    self.drop_partial(src);
                    return Ok(None);
                }

                // Even the shortest completion would exceed the limit
                if src.len() >= self.max_len {
                    let actual = src.len();
                    self.drop_partial(src);
                    self.discarding = true;
                    return Err(error::ProtocolError::MessageTooLong {
                        actual,
                        limit: self.max_len,
                    });
                }

                self.next_index = src.len();
                return Ok(None);
            };

            self.next_index = 0;

            if self.discarding {
                src.advance(pos + 2);
                self.discarding = false;
                continue;
            }

            let line = src.split_to(pos + 2);
            if line.len() > self.max_len {
                return Err(error::ProtocolError::MessageTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            return Ok(Some(String::from_utf8_lossy(&line[..pos]).into_owned()));
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        dst.extend_from_slice(msg.as_bytes());
        Ok(())
    }
}
