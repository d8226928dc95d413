//! Channel name utilities.
//!
//! # Reference
//! - RFC 2812 Section 1.3: Channel names

/// Extension trait for checking if a string is a valid IRC channel name.
pub trait ChannelExt {
    /// Check if this string is a valid IRC channel name.
    ///
    /// Valid channel names start with `#`, `&`, `+` or `!`, are at most 50
    /// characters long and contain no space, comma or control character.
    fn is_channel_name(&self) -> bool;
}

impl ChannelExt for str {
    fn is_channel_name(&self) -> bool {
        let mut chars = self.chars();

        match chars.next() {
            Some('#' | '&' | '+' | '!') => {}
            _ => return false,
        }

        if self.chars().count() > 50 {
            return false;
        }

        chars.all(|c| c != ' ' && c != ',' && !c.is_control())
    }
}

impl ChannelExt for String {
    fn is_channel_name(&self) -> bool {
        self.as_str().is_channel_name()
    }
}
