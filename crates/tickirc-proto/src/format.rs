//! IRC formatting control characters.
//!
//! Formatting codes (bold, color, italic and friends) are allowed in message
//! content and can be stripped before display. A small set of other control
//! characters is refused on the way out.

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;

/// Color introducer (^C).
const COLOR: char = '\x03';

/// Returns true if the character is an IRC formatting code.
///
/// ```
/// use tickirc_proto::format::is_irc_format_code;
///
/// assert!(is_irc_format_code('\x02'));
/// assert!(is_irc_format_code('\x03'));
/// assert!(!is_irc_format_code('a'));
/// ```
#[inline]
pub fn is_irc_format_code(ch: char) -> bool {
    matches!(
        ch,
        '\x02' | '\x03' | '\x04' | '\x0F' | '\x11' | '\x16' | '\x1D' | '\x1E' | '\x1F'
    )
}

/// Returns true if a control character must not appear in an outbound line.
///
/// CR and LF are line delimiters and are handled by the encoder. The CTCP
/// delimiter (0x01), NUL and formatting codes are allowed. BEL and every
/// other C0 control are refused, as is DEL.
#[inline]
pub fn is_illegal_control_char(ch: char) -> bool {
    if ch == '\x7F' {
        return true;
    }
    ch.is_ascii_control()
        && !matches!(ch, '\x00' | '\x01' | '\r' | '\n')
        && !is_irc_format_code(ch)
}

/// Returns true if `text` contains any formatting code.
pub fn is_formatted(text: &str) -> bool {
    text.chars().any(is_irc_format_code)
}

/// Skip up to two ASCII digits.
fn skip_digits(chars: &mut Peekable<Chars<'_>>) -> usize {
    let mut n = 0;
    while n < 2 && chars.peek().is_some_and(|c| c.is_ascii_digit()) {
        chars.next();
        n += 1;
    }
    n
}

/// Remove formatting codes and color arguments from `text`.
///
/// A color code may be followed by one or two foreground digits and an
/// optional `,` with one or two background digits. A comma not followed by a
/// digit is ordinary text.
///
/// ```
/// use tickirc_proto::strip_formatting;
///
/// assert_eq!(strip_formatting("\x0304,12red\x03 and \x02bold\x02"), "red and bold");
/// assert_eq!(strip_formatting("\x034,text"), ",text");
/// ```
pub fn strip_formatting(text: &str) -> Cow<'_, str> {
    if !is_formatted(text) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == COLOR {
            if skip_digits(&mut chars) > 0 && chars.peek() == Some(&',') {
                let mut ahead = chars.clone();
                ahead.next();
                if ahead.peek().is_some_and(|c| c.is_ascii_digit()) {
                    chars.next();
                    skip_digits(&mut chars);
                }
            }
        } else if !is_irc_format_code(c) {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_control_chars() {
        assert!(is_illegal_control_char('\x07'));
        assert!(is_illegal_control_char('\x1B'));
        assert!(is_illegal_control_char('\x7F'));
        assert!(!is_illegal_control_char('\x01'));
        assert!(!is_illegal_control_char('\x02'));
        assert!(!is_illegal_control_char('\r'));
        assert!(!is_illegal_control_char('\n'));
        assert!(!is_illegal_control_char('a'));
        assert!(!is_illegal_control_char('é'));
    }

    #[test]
    fn test_strip_plain_borrows() {
        assert!(matches!(strip_formatting("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_colors() {
        assert_eq!(strip_formatting("\x034red"), "red");
        assert_eq!(strip_formatting("\x0304red"), "red");
        assert_eq!(strip_formatting("\x034,5x"), "x");
        assert_eq!(strip_formatting("\x0312,15x"), "x");
        assert_eq!(strip_formatting("\x03reset"), "reset");
        assert_eq!(strip_formatting("\x03123"), "3");
    }

    #[test]
    fn test_strip_toggles() {
        assert_eq!(
            strip_formatting("\x02b\x02 \x1Di\x1D \x1Fu\x1F \x16r\x16 \x0Fo"),
            "b i u r o"
        );
    }

    #[test]
    fn test_ctcp_delimiter_kept() {
        assert_eq!(strip_formatting("\x01VERSION\x01\x02"), "\x01VERSION\x01");
    }
}
