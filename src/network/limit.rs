//! Outbound flood control.
//!
//! Implements a token bucket in front of a bounded FIFO of encoded lines.
//! Tokens are bytes: a message costs its own length. The bucket refills at a
//! fixed rate up to its burst capacity, and `drain` sends the longest run of
//! head messages the current tokens cover.

use std::collections::VecDeque;
use std::io;
use std::time::Instant;

use bytes::Bytes;
use thiserror::Error;
use tickirc_proto::{Command, IrcCodec, ProtocolError};
use tracing::{trace, warn};

use crate::config::RateLimitConfig;

/// An encoded line waiting to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    payload: Bytes,
}

impl OutboundMessage {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Serialize and sanitize `command` into a wire line.
    pub fn encode(command: &Command) -> Result<Self, ProtocolError> {
        let line = IrcCodec::sanitize(command.to_string())?;
        Ok(Self::new(line.into_bytes()))
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// The payload as text, CRLF removed, for diagnostics.
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.payload)
            .trim_end_matches(['\r', '\n'])
            .to_string()
    }
}

/// Why a message was refused by [`SendQueue::enqueue`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnqueueError {
    #[error("{max} messages already queued")]
    TooManyMessages { max: usize },
    #[error("{queued} bytes queued, {len} more would exceed {max}")]
    TooManyBytes { queued: usize, len: usize, max: usize },
}

/// What one `drain` pass did.
#[derive(Debug, Default)]
pub struct DrainReport {
    /// Messages handed to the sink.
    pub sent: usize,
    /// Bytes handed to the sink.
    pub sent_bytes: usize,
    /// Messages dropped because they can never fit in the bucket.
    pub evicted: Vec<OutboundMessage>,
}

/// Token bucket rate limiter over a bounded message queue.
///
/// Invariants:
/// - `len() <= max_messages`
/// - `queued_bytes() <= max_bytes`
/// - `0 <= tokens() <= burst`
#[derive(Debug)]
pub struct SendQueue {
    queue: VecDeque<OutboundMessage>,
    queued_bytes: usize,
    tokens: f64,
    last_refill: Instant,
    rate: f64,
    burst: usize,
    max_messages: usize,
    max_bytes: usize,
}

impl SendQueue {
    /// Create an empty queue with a full bucket.
    pub fn new(config: &RateLimitConfig, now: Instant) -> Self {
        Self {
            queue: VecDeque::new(),
            queued_bytes: 0,
            tokens: config.burst_bytes as f64,
            last_refill: now,
            rate: config.refill_rate,
            burst: config.burst_bytes,
            max_messages: config.max_messages,
            max_bytes: config.max_bytes,
        }
    }

    /// Append a message if both the count and byte limits allow it.
    ///
    /// On refusal the message is dropped and the queue is unchanged.
    pub fn enqueue(&mut self, message: OutboundMessage) -> Result<(), EnqueueError> {
        if self.queue.len() + 1 > self.max_messages {
            return Err(EnqueueError::TooManyMessages {
                max: self.max_messages,
            });
        }
        if self.queued_bytes + message.len() > self.max_bytes {
            return Err(EnqueueError::TooManyBytes {
                queued: self.queued_bytes,
                len: message.len(),
                max: self.max_bytes,
            });
        }

        self.queued_bytes += message.len();
        self.queue.push_back(message);
        Ok(())
    }

    /// Add tokens for the time elapsed since the last refill.
    pub fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.last_refill = now;
        self.tokens = (self.tokens + elapsed * self.rate).clamp(0.0, self.burst as f64);
    }

    /// Send head messages while the bucket covers them.
    ///
    /// Messages at the head longer than the burst capacity are evicted first,
    /// without consuming tokens. Sending then stops at the first message the
    /// bucket cannot cover, so what goes out is always a FIFO prefix. On a
    /// sink failure the failing message stays at the head and the error is
    /// returned.
    pub fn drain<F>(&mut self, mut sink: F) -> io::Result<DrainReport>
    where
        F: FnMut(&[u8]) -> io::Result<()>,
    {
        let mut report = DrainReport::default();

        while self.queue.front().is_some_and(|head| head.len() > self.burst) {
            if let Some(evicted) = self.pop_front() {
                warn!(len = evicted.len(), burst = self.burst, "Evicting message larger than burst capacity");
                report.evicted.push(evicted);
            }
        }

        while let Some(head) = self.queue.front() {
            let len = head.len();
            if len as f64 > self.tokens {
                break;
            }

            sink(head.payload())?;
            self.tokens -= len as f64;
            self.pop_front();
            report.sent += 1;
            report.sent_bytes += len;
        }

        if report.sent > 0 {
            trace!(
                sent = report.sent,
                bytes = report.sent_bytes,
                remaining = self.queue.len(),
                tokens = self.tokens,
                "Drained send queue"
            );
        }
        Ok(report)
    }

    /// Refill, then drain. Called once per tick.
    pub fn flush<F>(&mut self, now: Instant, sink: F) -> io::Result<DrainReport>
    where
        F: FnMut(&[u8]) -> io::Result<()>,
    {
        self.refill(now);
        self.drain(sink)
    }

    /// Empty the queue and fill the bucket. Called on connect.
    pub fn reset(&mut self, now: Instant) {
        self.clear();
        self.tokens = self.burst as f64;
        self.last_refill = now;
    }

    /// Discard everything queued. Called on disconnect.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.queued_bytes = 0;
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn queued_bytes(&self) -> usize {
        self.queued_bytes
    }

    pub fn tokens(&self) -> f64 {
        self.tokens
    }

    pub fn burst(&self) -> usize {
        self.burst
    }

    fn pop_front(&mut self) -> Option<OutboundMessage> {
        let message = self.queue.pop_front()?;
        self.queued_bytes -= message.len();
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(max_messages: usize, max_bytes: usize, burst: usize, rate: f64) -> RateLimitConfig {
        RateLimitConfig {
            max_messages,
            max_bytes,
            burst_bytes: burst,
            refill_rate: rate,
        }
    }

    fn msg(len: usize) -> OutboundMessage {
        OutboundMessage::new(vec![b'x'; len])
    }

    fn collect(queue: &mut SendQueue) -> (DrainReport, Vec<usize>) {
        let mut sent = Vec::new();
        let report = queue
            .drain(|data| {
                sent.push(data.len());
                Ok(())
            })
            .unwrap();
        (report, sent)
    }

    #[test]
    fn test_encode_command() {
        let msg = OutboundMessage::encode(&Command::Privmsg("#ufo".into(), "hi\r\nQUIT".into()))
            .unwrap();
        assert_eq!(msg.payload().as_ref(), b"PRIVMSG #ufo :hi\r\n");
        assert_eq!(msg.as_text(), "PRIVMSG #ufo :hi");
    }

    #[test]
    fn test_initial_capacity() {
        let now = Instant::now();
        let mut queue = SendQueue::new(&config(100, 2500, 250, 10.0), now);
        assert_eq!(queue.tokens(), 250.0);

        for _ in 0..3 {
            queue.enqueue(msg(100)).unwrap();
        }
        let (report, sent) = collect(&mut queue);
        assert_eq!(sent, vec![100, 100]);
        assert_eq!(report.sent_bytes, 200);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.tokens(), 50.0);
    }

    #[test]
    fn test_message_count_limit() {
        let now = Instant::now();
        let mut queue = SendQueue::new(&config(5, 2500, 250, 10.0), now);
        for _ in 0..5 {
            queue.enqueue(msg(10)).unwrap();
        }
        assert_eq!(
            queue.enqueue(msg(10)),
            Err(EnqueueError::TooManyMessages { max: 5 })
        );
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.queued_bytes(), 50);
    }

    #[test]
    fn test_byte_limit() {
        let now = Instant::now();
        let mut queue = SendQueue::new(&config(100, 100, 250, 10.0), now);
        queue.enqueue(msg(60)).unwrap();
        assert!(matches!(
            queue.enqueue(msg(41)),
            Err(EnqueueError::TooManyBytes { queued: 60, len: 41, max: 100 })
        ));
        queue.enqueue(msg(40)).unwrap();
        assert_eq!(queue.queued_bytes(), 100);
    }

    #[test]
    fn test_rate_replenish() {
        let start = Instant::now();
        let mut queue = SendQueue::new(&config(100, 2500, 250, 10.0), start);
        queue.enqueue(msg(250)).unwrap();
        queue.enqueue(msg(20)).unwrap();
        let (_, sent) = collect(&mut queue);
        assert_eq!(sent, vec![250]);

        queue.refill(start + Duration::from_secs(1));
        let (_, sent) = collect(&mut queue);
        assert!(sent.is_empty());

        queue.refill(start + Duration::from_secs(2));
        let (_, sent) = collect(&mut queue);
        assert_eq!(sent, vec![20]);
        assert_eq!(queue.tokens(), 0.0);
    }

    #[test]
    fn test_refill_caps_at_burst() {
        let start = Instant::now();
        let mut queue = SendQueue::new(&config(100, 2500, 250, 10.0), start);
        queue.refill(start + Duration::from_secs(3600));
        assert_eq!(queue.tokens(), 250.0);
    }

    #[test]
    fn test_oversized_messages_are_evicted() {
        let now = Instant::now();
        let mut queue = SendQueue::new(&config(100, 2500, 250, 10.0), now);
        queue.enqueue(msg(300)).unwrap();
        queue.enqueue(msg(10)).unwrap();
        queue.enqueue(msg(251)).unwrap();
        queue.enqueue(msg(20)).unwrap();

        // Only the leading oversized message goes; 251 blocks until it reaches the head
        let (report, sent) = collect(&mut queue);
        assert_eq!(sent, vec![10]);
        assert_eq!(report.evicted.len(), 1);
        assert_eq!(report.evicted[0].len(), 300);
        assert_eq!(queue.len(), 2);

        let (report, sent) = collect(&mut queue);
        assert_eq!(sent, vec![20]);
        assert_eq!(report.evicted.len(), 1);
        assert_eq!(report.evicted[0].len(), 251);
        assert_eq!(queue.tokens(), 220.0);
        assert!(queue.is_empty());
        assert_eq!(queue.queued_bytes(), 0);
    }

    #[test]
    fn test_oversized_message_blocks_later_messages() {
        let now = Instant::now();
        let mut queue = SendQueue::new(&config(100, 2500, 250, 10.0), now);
        queue.enqueue(msg(10)).unwrap();
        queue.enqueue(msg(300)).unwrap();
        queue.enqueue(msg(20)).unwrap();

        let (report, sent) = collect(&mut queue);
        assert_eq!(sent, vec![10]);
        assert!(report.evicted.is_empty());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_negative_rate_never_drains_below_zero() {
        let start = Instant::now();
        let mut queue = SendQueue::new(&config(100, 2500, 250, -50.0), start);
        queue.refill(start + Duration::from_secs(60));
        assert_eq!(queue.tokens(), 0.0);
    }

    #[test]
    fn test_sink_failure_keeps_head() {
        let now = Instant::now();
        let mut queue = SendQueue::new(&config(100, 2500, 250, 10.0), now);
        queue.enqueue(msg(10)).unwrap();
        queue.enqueue(msg(10)).unwrap();

        let mut calls = 0;
        let result = queue.drain(|_| {
            calls += 1;
            if calls == 2 {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.tokens(), 240.0);
    }

    #[test]
    fn test_reset_and_clear() {
        let start = Instant::now();
        let mut queue = SendQueue::new(&config(100, 2500, 250, 10.0), start);
        queue.enqueue(msg(200)).unwrap();
        let _ = collect(&mut queue);
        queue.enqueue(msg(100)).unwrap();

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.queued_bytes(), 0);
        assert_eq!(queue.tokens(), 50.0);

        queue.reset(start + Duration::from_millis(1));
        assert_eq!(queue.tokens(), 250.0);
    }
}
