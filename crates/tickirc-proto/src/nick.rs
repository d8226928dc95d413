//! Nickname and channel-membership prefix helpers.

use std::fmt;

/// Channel membership marker carried in front of a nickname.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NickPrefix {
    /// Channel operator (`@`).
    Operator,
    /// Voiced user (`+`).
    Voice,
    /// Plain member.
    #[default]
    None,
}

impl NickPrefix {
    /// Map a prefix character to a membership marker.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '@' => Some(Self::Operator),
            '+' => Some(Self::Voice),
            _ => None,
        }
    }

    /// The prefix character, if any.
    pub fn symbol(self) -> Option<char> {
        match self {
            Self::Operator => Some('@'),
            Self::Voice => Some('+'),
            Self::None => None,
        }
    }
}

impl fmt::Display for NickPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(c) => write!(f, "{}", c),
            None => Ok(()),
        }
    }
}

/// Split a NAMES token or message prefix into membership marker and bare nick.
///
/// A leading `@` or `+` becomes the marker; anything from `!` onwards
/// (user and host) is dropped.
///
/// ```
/// use tickirc_proto::{parse_name, NickPrefix};
///
/// assert_eq!(parse_name("@alice"), (NickPrefix::Operator, "alice"));
/// assert_eq!(parse_name("bob!~b@example.org"), (NickPrefix::None, "bob"));
/// ```
pub fn parse_name(mask: &str) -> (NickPrefix, &str) {
    let mut chars = mask.chars();
    let (prefix, rest) = match chars.next().and_then(NickPrefix::from_char) {
        Some(prefix) => (prefix, chars.as_str()),
        None => (NickPrefix::None, mask),
    };
    let nick = rest.split_once('!').map_or(rest, |(nick, _)| nick);
    (prefix, nick)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name() {
        assert_eq!(parse_name("+carol"), (NickPrefix::Voice, "carol"));
        assert_eq!(parse_name("dave"), (NickPrefix::None, "dave"));
        assert_eq!(parse_name("@op!u@h"), (NickPrefix::Operator, "op"));
        assert_eq!(parse_name(""), (NickPrefix::None, ""));
        assert_eq!(parse_name("@"), (NickPrefix::Operator, ""));
    }

    #[test]
    fn test_display_order() {
        assert_eq!(NickPrefix::Operator.to_string(), "@");
        assert_eq!(NickPrefix::None.to_string(), "");
        assert!(NickPrefix::Operator < NickPrefix::Voice);
        assert!(NickPrefix::Voice < NickPrefix::None);
    }
}
