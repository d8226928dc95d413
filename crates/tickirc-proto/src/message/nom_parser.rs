//! Nom-based line decomposition.
//!
//! Splits a single IRC line (CRLF already removed or not) into borrowed
//! prefix, command, middle params and trailing slices.

use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::opt,
    sequence::preceded,
    IResult,
};
use smallvec::SmallVec;

use crate::error::MessageParseError;

/// Parse message prefix (the part after `:` and before the first space).
fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while(|c| c != ' '))(input)
}

/// Parse the command token (a run of non-space characters).
fn parse_command(input: &str) -> IResult<&str, &str> {
    take_while1(|c| c != ' ')(input)
}

/// Middle params up to the trailing marker, plus the trailing text itself.
///
/// Multiple consecutive spaces are treated as a single separator. No
/// parameter count limit is applied.
fn parse_params(input: &str) -> (SmallVec<[&str; 15]>, Option<&str>) {
    let mut params: SmallVec<[&str; 15]> = SmallVec::new();
    let mut rest = input;

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return (params, None);
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            return (params, Some(trailing));
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }
}

fn is_three_digits(cmd: &str) -> bool {
    cmd.len() == 3 && cmd.bytes().all(|b| b.is_ascii_digit())
}

/// A parsed IRC line with borrowed string slices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedMessage<'a> {
    /// Raw prefix (without the leading `:`), if present.
    pub prefix: Option<&'a str>,
    /// The command token, verbatim.
    pub command: &'a str,
    /// Middle parameters.
    pub params: SmallVec<[&'a str; 15]>,
    /// Text after the ` :` marker, if present.
    pub trailing: Option<&'a str>,
}

/// Parse a complete IRC line into its components.
///
/// ```text
/// [":" prefix SPACE] command [SPACE params]* [SPACE ":" trailing]
/// ```
pub(crate) fn parse_message(input: &str) -> Result<ParsedMessage<'_>, MessageParseError> {
    let line = input.trim_end_matches(['\r', '\n']);
    if line.trim_matches(' ').is_empty() {
        return Err(MessageParseError::EmptyMessage);
    }

    let (rest, prefix) = opt(parse_prefix)(line).map_err(|_| MessageParseError::InvalidCommand)?;

    let rest = rest.trim_start_matches(' ');
    if rest.is_empty() {
        return Err(match prefix {
            Some(_) => MessageParseError::UnterminatedOrigin,
            None => MessageParseError::EmptyMessage,
        });
    }

    let (rest, command) = parse_command(rest).map_err(|_| MessageParseError::InvalidCommand)?;
    if command.starts_with(':') {
        return Err(MessageParseError::InvalidCommand);
    }
    if command.starts_with(|c: char| c.is_ascii_digit()) && !is_three_digits(command) {
        return Err(MessageParseError::InvalidNumeric(command.to_string()));
    }

    let (params, trailing) = parse_params(rest);

    Ok(ParsedMessage {
        prefix,
        command,
        params,
        trailing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefix() {
        assert_eq!(
            parse_prefix(":nick!user@host PRIVMSG"),
            Ok((" PRIVMSG", "nick!user@host"))
        );
        assert!(parse_prefix("PRIVMSG").is_err());
    }

    #[test]
    fn test_parse_full_line() {
        let msg = parse_message(":nick!user@host PRIVMSG #chan :hello world\r\n").unwrap();
        assert_eq!(msg.prefix, Some("nick!user@host"));
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params.as_slice(), &["#chan"]);
        assert_eq!(msg.trailing, Some("hello world"));
    }

    #[test]
    fn test_parse_without_prefix() {
        let msg = parse_message("PING :irc.example.net").unwrap();
        assert_eq!(msg.prefix, None);
        assert_eq!(msg.command, "PING");
        assert!(msg.params.is_empty());
        assert_eq!(msg.trailing, Some("irc.example.net"));
    }

    #[test]
    fn test_multiple_spaces_collapse() {
        let msg = parse_message(":srv   MODE   #chan    +o   bob").unwrap();
        assert_eq!(msg.command, "MODE");
        assert_eq!(msg.params.as_slice(), &["#chan", "+o", "bob"]);
        assert_eq!(msg.trailing, None);
    }

    #[test]
    fn test_empty_trailing() {
        let msg = parse_message("TOPIC #chan :").unwrap();
        assert_eq!(msg.trailing, Some(""));
    }

    #[test]
    fn test_trailing_keeps_colons_and_spaces() {
        let msg = parse_message("PRIVMSG #c :a :b  c ").unwrap();
        assert_eq!(msg.trailing, Some("a :b  c "));
    }

    #[test]
    fn test_more_than_fifteen_params() {
        let line = format!("CMD {}", vec!["p"; 20].join(" "));
        let msg = parse_message(&line).unwrap();
        assert_eq!(msg.params.len(), 20);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_message(""), Err(MessageParseError::EmptyMessage));
        assert_eq!(parse_message("   \r\n"), Err(MessageParseError::EmptyMessage));
        assert_eq!(
            parse_message(":server"),
            Err(MessageParseError::UnterminatedOrigin)
        );
        assert_eq!(
            parse_message(":server   "),
            Err(MessageParseError::UnterminatedOrigin)
        );
        assert_eq!(
            parse_message(":srv 12 nick"),
            Err(MessageParseError::InvalidNumeric("12".to_string()))
        );
        assert_eq!(
            parse_message(":srv 0012 nick"),
            Err(MessageParseError::InvalidNumeric("0012".to_string()))
        );
        assert_eq!(
            parse_message(":srv 1a2 nick"),
            Err(MessageParseError::InvalidNumeric("1a2".to_string()))
        );
    }
}
