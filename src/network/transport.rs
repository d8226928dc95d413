//! Byte transports under the connection driver.
//!
//! A [`Transport`] never blocks after `connect`: `recv` returns `Ok(0)` when
//! nothing is available, and `send` buffers whatever the socket does not
//! take immediately.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;

use bytes::{Buf, BytesMut};
use parking_lot::Mutex;
use tracing::{debug, trace};

/// Non-blocking byte stream to an IRC server.
pub trait Transport {
    /// Open a connection. May block for the OS connect timeout.
    fn connect(&mut self, host: &str, port: u16) -> io::Result<()>;

    /// Queue `data` for transmission, writing as much as possible now.
    fn send(&mut self, data: &[u8]) -> io::Result<()>;

    /// Read available bytes into `buf`. `Ok(0)` means nothing available;
    /// a closed peer is reported as an error.
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Close the connection. Safe to call when not connected.
    fn close(&mut self);
}

fn not_connected() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "transport is not connected")
}

fn peer_closed() -> io::Error {
    io::Error::new(io::ErrorKind::ConnectionAborted, "connection closed by peer")
}

// ============================================================================
// TCP
// ============================================================================

/// Plain TCP transport over a non-blocking `TcpStream`.
#[derive(Debug, Default)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
    pending: BytesMut,
}

impl TcpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes accepted by `send` but not yet written to the socket.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn flush_pending(&mut self) -> io::Result<()> {
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;
        while !self.pending.is_empty() {
            match stream.write(&self.pending) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "socket accepted no bytes",
                    ));
                }
                Ok(n) => self.pending.advance(n),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl Transport for TcpTransport {
    fn connect(&mut self, host: &str, port: u16) -> io::Result<()> {
        self.close();
        let stream = TcpStream::connect((host, port))?;
        stream.set_nodelay(true)?;
        stream.set_nonblocking(true)?;
        debug!(host, port, peer = ?stream.peer_addr().ok(), "TCP connected");
        self.stream = Some(stream);
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        if self.stream.is_none() {
            return Err(not_connected());
        }
        self.pending.extend_from_slice(data);
        self.flush_pending()
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.flush_pending()?;
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;
        match stream.read(buf) {
            Ok(0) => Err(peer_closed()),
            Ok(n) => Ok(n),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            // One non-blocking attempt at whatever is still pending
            if !self.pending.is_empty() {
                let _ = stream.write(&self.pending);
            }
            let _ = stream.shutdown(Shutdown::Both);
            trace!("TCP closed");
        }
        self.pending.clear();
    }
}

// ============================================================================
// In-memory
// ============================================================================

#[derive(Debug, Default)]
struct Wire {
    connected: bool,
    inbound: BytesMut,
    outbound: Vec<u8>,
    connects: Vec<(String, u16)>,
    refuse_connect: bool,
    fail_sends: bool,
    peer_closed: bool,
}

/// In-process transport for tests and embedding.
///
/// Clones share the same wire: one clone goes into the client, the other
/// plays the server by pushing inbound bytes and reading what was sent.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    wire: Arc<Mutex<Wire>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make bytes available to the next `recv`.
    pub fn push_inbound(&self, data: impl AsRef<[u8]>) {
        self.wire.lock().inbound.extend_from_slice(data.as_ref());
    }

    /// Everything sent since the last call.
    pub fn take_outbound(&self) -> Vec<u8> {
        std::mem::take(&mut self.wire.lock().outbound)
    }

    /// Sent lines since the last call, CRLF removed.
    pub fn take_lines(&self) -> Vec<String> {
        let data = self.take_outbound();
        String::from_utf8_lossy(&data)
            .split("\r\n")
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Make the next connect attempt fail.
    pub fn refuse_connect(&self, refuse: bool) {
        self.wire.lock().refuse_connect = refuse;
    }

    /// Make every send fail.
    pub fn fail_sends(&self, fail: bool) {
        self.wire.lock().fail_sends = fail;
    }

    /// Simulate the server closing the connection once inbound is drained.
    pub fn close_from_peer(&self) {
        self.wire.lock().peer_closed = true;
    }

    pub fn is_connected(&self) -> bool {
        self.wire.lock().connected
    }

    /// Every `(host, port)` passed to `connect`.
    pub fn connects(&self) -> Vec<(String, u16)> {
        self.wire.lock().connects.clone()
    }
}

impl Transport for MemoryTransport {
    fn connect(&mut self, host: &str, port: u16) -> io::Result<()> {
        let mut wire = self.wire.lock();
        wire.connects.push((host.to_string(), port));
        if wire.refuse_connect {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ));
        }
        wire.connected = true;
        wire.peer_closed = false;
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        let mut wire = self.wire.lock();
        if !wire.connected {
            return Err(not_connected());
        }
        if wire.fail_sends {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"));
        }
        wire.outbound.extend_from_slice(data);
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut wire = self.wire.lock();
        if !wire.connected {
            return Err(not_connected());
        }
        if wire.inbound.is_empty() {
            return if wire.peer_closed {
                Err(peer_closed())
            } else {
                Ok(0)
            };
        }
        let n = buf.len().min(wire.inbound.len());
        buf[..n].copy_from_slice(&wire.inbound[..n]);
        wire.inbound.advance(n);
        Ok(n)
    }

    fn close(&mut self) {
        let mut wire = self.wire.lock();
        wire.connected = false;
        wire.inbound.clear();
    }
}
