//! Integration tests for error handling scenarios
//!
//! Malformed input must surface as a typed error without poisoning the
//! codec for the lines that follow.

use bytes::BytesMut;
use tickirc_proto::{IrcCodec, MessageParseError, ProtocolError, ServerMessage};
use tokio_util::codec::Decoder;

#[test]
fn test_parse_error_kinds() {
    let cases = [
        ("", MessageParseError::EmptyMessage),
        ("   \r\n", MessageParseError::EmptyMessage),
        (":irc.example.net", MessageParseError::UnterminatedOrigin),
        (":irc.example.net 01 nick", MessageParseError::InvalidNumeric("01".into())),
        (":irc.example.net 4044 nick", MessageParseError::InvalidNumeric("4044".into())),
    ];

    for (input, expected) in cases {
        match ServerMessage::parse(input) {
            Err(ProtocolError::InvalidMessage { string, cause }) => {
                assert_eq!(string, input);
                assert_eq!(cause, expected, "wrong cause for {:?}", input);
            }
            other => panic!("{:?} should fail, got {:?}", input, other),
        }
    }
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = ServerMessage::parse(":only-prefix").unwrap_err();
    let text = err.to_string();
    assert!(text.contains(":only-prefix"), "error should name the line: {}", text);
    assert_eq!(err.error_code(), "invalid_message");
}

#[test]
fn test_codec_recovers_after_overlong_line() {
    let mut codec = IrcCodec::with_max_len(64);
    let mut buf = BytesMut::new();
    buf.extend_from_slice(format!(":srv NOTICE * :{}\r\n", "x".repeat(100)).as_bytes());
    buf.extend_from_slice(b"PING :after\r\n");

    assert!(matches!(
        codec.decode(&mut buf),
        Err(ProtocolError::MessageTooLong { limit: 64, .. })
    ));
    let msg = codec.decode(&mut buf).unwrap().expect("next line decodes");
    assert_eq!(msg.trailing, "after");
}

#[test]
fn test_codec_recovers_after_bad_line() {
    let mut codec = IrcCodec::new();
    let mut buf = BytesMut::from(":lonely\r\n:srv 001 me :hi\r\n");

    assert!(codec.decode(&mut buf).is_err());
    let msg = codec.decode(&mut buf).unwrap().unwrap();
    assert_eq!(msg.numeric(), Some(1));
}

#[test]
fn test_control_characters_in_params_parse() {
    let msg = ServerMessage::parse("PRIVMSG #c :\x02bold\x02 \x01").unwrap();
    assert_eq!(msg.trailing, "\x02bold\x02 \x01");
}
