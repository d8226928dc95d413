//! Scripted server end of an in-memory wire.

use tickirc::MemoryTransport;

/// Plays the IRC server: pushes lines to the client and collects what the
/// client sent.
#[derive(Debug, Clone, Default)]
pub struct TestServer {
    wire: MemoryTransport,
}

#[allow(dead_code)]
impl TestServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport handle for the client side.
    pub fn transport(&self) -> MemoryTransport {
        self.wire.clone()
    }

    /// Send one line to the client; CRLF is appended.
    pub fn send(&self, line: &str) {
        self.wire.push_inbound(format!("{line}\r\n"));
    }

    /// Send raw bytes to the client.
    pub fn send_raw(&self, data: impl AsRef<[u8]>) {
        self.wire.push_inbound(data);
    }

    /// Lines the client sent since the last call.
    pub fn sent(&self) -> Vec<String> {
        self.wire.take_lines()
    }

    pub fn wire(&self) -> &MemoryTransport {
        &self.wire
    }
}
