//! Integration tests for outbound flood control.

mod common;

use std::time::{Duration, Instant};

use common::{client_with, config, later};
use proptest::prelude::*;
use tickirc::config::RateLimitConfig;
use tickirc::network::{EnqueueError, OutboundMessage};
use tickirc::SendQueue;

fn limits(max_messages: usize, max_bytes: usize, burst: usize, rate: f64) -> RateLimitConfig {
    RateLimitConfig {
        max_messages,
        max_bytes,
        burst_bytes: burst,
        refill_rate: rate,
    }
}

fn message(len: usize, tag: u8) -> OutboundMessage {
    OutboundMessage::new(vec![b'a' + tag % 26; len])
}

#[test]
fn test_sixth_message_refused() {
    let mut queue = SendQueue::new(&limits(5, 2500, 250, 10.0), Instant::now());
    for i in 0..5 {
        queue.enqueue(message(10, i)).unwrap();
    }
    assert_eq!(
        queue.enqueue(message(10, 5)),
        Err(EnqueueError::TooManyMessages { max: 5 })
    );
    assert_eq!(queue.len(), 5);
    assert_eq!(queue.queued_bytes(), 50);
}

#[test]
fn test_evicted_message_reported_to_host() {
    let mut cfg = config();
    cfg.rate_limit.burst_bytes = 120;
    let (mut client, server) = client_with(cfg);
    client.connect("irc.test", 6667).unwrap();
    server.sent();

    client.privmsg("#ufo", &"x".repeat(200)).unwrap();
    client.privmsg("#ufo", "short").unwrap();
    client.tick().unwrap();

    assert_eq!(server.sent(), vec!["PRIVMSG #ufo :short".to_string()]);
    assert!(client.host().saw("Message too long to send, dropped: PRIVMSG #ufo :xxx"));
}

#[test]
fn test_client_respects_refill_rate() {
    let mut cfg = config();
    cfg.rate_limit.burst_bytes = 100;
    cfg.rate_limit.refill_rate = 20.0;
    let (mut client, server) = client_with(cfg);

    let start = Instant::now();
    client.connect_at("irc.test", 6667, start).unwrap();
    server.sent();
    // Handshake used 47 of 100 tokens; each of these lines is 25 bytes
    for i in 0..4 {
        client.privmsg("#ufo", &format!("message {i}")).unwrap();
    }

    client.tick_at(start).unwrap();
    assert_eq!(server.sent().len(), 2);

    client.tick_at(start + Duration::from_millis(500)).unwrap();
    assert!(server.sent().is_empty());

    client.tick_at(later(start, 3)).unwrap();
    assert_eq!(server.sent().len(), 2);
    assert!(client.queue().is_empty());
}

/// Reference model: which messages one drain evicts and sends. Oversized
/// messages are only evicted while they sit at the head; after that the
/// longest fitting prefix goes out.
fn expected_drain(lens: &[usize], budget: usize, burst: usize) -> (Vec<usize>, Vec<usize>) {
    let mut budget = budget;
    let evicted: Vec<usize> = lens.iter().take_while(|&&len| len > burst).enumerate().map(|(i, _)| i).collect();
    let mut sent = Vec::new();
    for (i, &len) in lens.iter().enumerate().skip(evicted.len()) {
        if len > budget {
            break;
        }
        budget -= len;
        sent.push(i);
    }
    (sent, evicted)
}

#[test]
fn test_oversized_message_mid_queue_stops_drain() {
    let mut queue = SendQueue::new(&limits(10, 2500, 250, 10.0), Instant::now());
    for (i, len) in [10, 300, 20].into_iter().enumerate() {
        queue.enqueue(message(len, i as u8)).unwrap();
    }

    let mut sent = Vec::new();
    let report = queue
        .drain(|data| {
            sent.push(data.len());
            Ok(())
        })
        .unwrap();
    assert_eq!(sent, vec![10]);
    assert!(report.evicted.is_empty());
    assert_eq!(queue.len(), 2);
}

proptest! {
    #[test]
    fn drain_sends_longest_fitting_prefix(
        burst in 20usize..300,
        rate in 1u32..50,
        warmup in 0usize..300,
        elapsed_secs in 0u64..20,
        lens in proptest::collection::vec(1usize..400, 0..20),
    ) {
        let t0 = Instant::now();
        let mut queue = SendQueue::new(&limits(100, 10_000, burst, f64::from(rate)), t0);

        // Spend part of the bucket first
        let warmup = warmup.min(burst);
        if warmup > 0 {
            queue.enqueue(message(warmup, 0)).unwrap();
            let report = queue.drain(|_| Ok(())).unwrap();
            prop_assert_eq!(report.sent, 1);
        }
        let tokens_before = burst - warmup;

        for (i, &len) in lens.iter().enumerate() {
            queue.enqueue(message(len, i as u8)).unwrap();
        }

        let budget = (tokens_before + elapsed_secs as usize * rate as usize).min(burst);
        let (want_sent, want_evicted) = expected_drain(&lens, budget, burst);

        let mut sent = Vec::new();
        let report = queue
            .flush(t0 + Duration::from_secs(elapsed_secs), |data| {
                sent.push(data.len());
                Ok(())
            })
            .unwrap();

        let want_sent_lens: Vec<usize> = want_sent.iter().map(|&i| lens[i]).collect();
        prop_assert_eq!(sent, want_sent_lens);
        prop_assert_eq!(report.sent, want_sent.len());
        prop_assert_eq!(report.evicted.len(), want_evicted.len());
        prop_assert!(report.evicted.iter().all(|m| m.len() > burst));
        prop_assert!(queue.tokens() >= 0.0 && queue.tokens() <= burst as f64);
    }

    #[test]
    fn refused_enqueue_leaves_queue_unchanged(
        max_messages in 1usize..10,
        max_bytes in 10usize..200,
        lens in proptest::collection::vec(1usize..80, 1..30),
    ) {
        let mut queue = SendQueue::new(&limits(max_messages, max_bytes, 250, 10.0), Instant::now());
        for (i, &len) in lens.iter().enumerate() {
            let (count, bytes) = (queue.len(), queue.queued_bytes());
            let fits = count < max_messages && bytes + len <= max_bytes;
            let result = queue.enqueue(message(len, i as u8));
            prop_assert_eq!(result.is_ok(), fits);
            if !fits {
                prop_assert_eq!(queue.len(), count);
                prop_assert_eq!(queue.queued_bytes(), bytes);
            }
            prop_assert!(queue.len() <= max_messages);
            prop_assert!(queue.queued_bytes() <= max_bytes);
        }
    }
}
