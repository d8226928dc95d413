//! Error types for the IRC protocol crate.
//!
//! [`ProtocolError`] covers everything the framer and codec can report;
//! [`MessageParseError`] describes why a single line could not be decomposed.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line exceeded the maximum allowed length.
    ///
    /// The framer has already discarded the offending bytes, so decoding
    /// can resume with the next line.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Bytes seen for the line when the limit was hit.
        actual: usize,
        /// Maximum allowed length, CRLF included.
        limit: usize,
    },

    /// Illegal control character in an outbound message.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// Failed to parse an IRC line.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The line that failed to parse.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

impl ProtocolError {
    /// Static label for log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::MessageTooLong { .. } => "message_too_long",
            Self::IllegalControlChar(_) => "illegal_control_char",
            Self::InvalidMessage { .. } => "invalid_message",
        }
    }
}

/// Errors encountered when parsing a single IRC line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Line was empty or contained only spaces.
    #[error("empty message")]
    EmptyMessage,

    /// A prefix was present but no command followed it.
    #[error("unterminated origin/prefix")]
    UnterminatedOrigin,

    /// No command token could be extracted.
    #[error("invalid command")]
    InvalidCommand,

    /// The command started with a digit but was not exactly three digits.
    #[error("invalid numeric command: {0}")]
    InvalidNumeric(String),
}
