//! Fuzz target for the CRLF framer with a small line limit.

#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use tickirc_proto::LineCodec;
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    let mut codec = LineCodec::with_max_len(32);
    let mut buf = BytesMut::new();
    for chunk in data.chunks(7) {
        buf.extend_from_slice(chunk);
        loop {
            match codec.decode(&mut buf) {
                Ok(Some(line)) => assert!(line.len() <= 30 * 3),
                Ok(None) => break,
                Err(_) => continue,
            }
        }
        // Nothing longer than the limit is ever held
        assert!(buf.len() <= 32);
    }
});
