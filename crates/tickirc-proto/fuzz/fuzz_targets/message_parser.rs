//! Fuzz target for server line parsing and CTCP detection.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;
use tickirc_proto::{Ctcp, ServerMessage};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = str::from_utf8(data) {
        if let Ok(msg) = ServerMessage::parse(input) {
            // Whatever parsed must re-join into a line that parses the same
            let again = ServerMessage::parse(&msg.to_string()).expect("re-joined line parses");
            assert_eq!(again, msg);
            let _ = Ctcp::parse(&msg.trailing);
        }
    }
});
