//! The joined channel and its roster.

use std::collections::BTreeMap;
use std::fmt;

use tickirc_proto::NickPrefix;

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelUser {
    pub nickname: String,
    pub prefix: NickPrefix,
}

impl fmt::Display for ChannelUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.nickname)
    }
}

/// A joined channel.
///
/// The roster is keyed by the ASCII-lowercased nickname, so a nick appears
/// at most once whatever case the server uses; entries keep the spelling
/// they were added with. Mutators return whether anything actually changed.
#[derive(Debug, Clone)]
pub struct Channel {
    name: String,
    key: Option<String>,
    topic: String,
    users: BTreeMap<String, ChannelUser>,
}

impl Channel {
    pub fn new(name: impl Into<String>, key: Option<String>) -> Self {
        Self {
            name: name.into(),
            key,
            topic: String::new(),
            users: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Channel names compare case-insensitively.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn set_topic(&mut self, text: impl Into<String>) {
        self.topic = text.into();
    }

    /// Add `nick` unless it is already present. An existing entry keeps its
    /// prefix.
    pub fn add_user(&mut self, prefix: NickPrefix, nick: &str) -> bool {
        let key = user_key(nick);
        if nick.is_empty() || self.users.contains_key(&key) {
            return false;
        }
        self.users.insert(
            key,
            ChannelUser {
                nickname: nick.to_string(),
                prefix,
            },
        );
        true
    }

    pub fn remove_user(&mut self, nick: &str) -> bool {
        self.users.remove(&user_key(nick)).is_some()
    }

    /// Replace `old` with `new` carrying `prefix`.
    pub fn rename_user(&mut self, old: &str, new: &str, prefix: NickPrefix) -> bool {
        let removed = self.remove_user(old);
        let added = self.add_user(prefix, new);
        removed || added
    }

    /// Insert `nick` or update its prefix.
    pub fn set_user_prefix(&mut self, prefix: NickPrefix, nick: &str) -> bool {
        match self.users.get_mut(&user_key(nick)) {
            Some(current) if current.prefix == prefix => false,
            Some(current) => {
                current.prefix = prefix;
                true
            }
            None => self.add_user(prefix, nick),
        }
    }

    pub fn user_prefix(&self, nick: &str) -> Option<NickPrefix> {
        self.users.get(&user_key(nick)).map(|user| user.prefix)
    }

    pub fn contains(&self, nick: &str) -> bool {
        self.users.contains_key(&user_key(nick))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Nicknames as added, ordered ignoring case.
    pub fn nicknames(&self) -> impl Iterator<Item = &str> {
        self.users.values().map(|user| user.nickname.as_str())
    }

    /// Roster in display order: operators, voiced users, then everyone else,
    /// each group sorted by nickname ignoring case.
    pub fn users(&self) -> Vec<ChannelUser> {
        let mut users: Vec<ChannelUser> = self.users.values().cloned().collect();
        users.sort_by(|a, b| {
            a.prefix.cmp(&b.prefix).then_with(|| {
                a.nickname
                    .to_ascii_lowercase()
                    .cmp(&b.nickname.to_ascii_lowercase())
            })
        });
        users
    }
}

fn user_key(nick: &str) -> String {
    nick.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_user_is_idempotent() {
        let mut channel = Channel::new("#ufo", None);
        assert!(channel.add_user(NickPrefix::Operator, "alice"));
        assert!(!channel.add_user(NickPrefix::Operator, "alice"));
        assert!(!channel.add_user(NickPrefix::None, "alice"));
        assert_eq!(channel.len(), 1);
        assert_eq!(channel.user_prefix("alice"), Some(NickPrefix::Operator));
    }

    #[test]
    fn test_remove_then_add_takes_new_prefix() {
        let mut channel = Channel::new("#ufo", None);
        channel.add_user(NickPrefix::None, "bob");
        assert!(channel.remove_user("bob"));
        assert!(channel.add_user(NickPrefix::Voice, "bob"));
        assert_eq!(channel.len(), 1);
        assert_eq!(channel.user_prefix("bob"), Some(NickPrefix::Voice));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut channel = Channel::new("#ufo", None);
        channel.add_user(NickPrefix::None, "a");
        channel.add_user(NickPrefix::None, "b");
        channel.add_user(NickPrefix::None, "c");
        assert!(!channel.remove_user("zed"));
        assert!(channel.remove_user("b"));
        assert_eq!(channel.nicknames().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_rename_keeps_given_prefix() {
        let mut channel = Channel::new("#ufo", None);
        channel.add_user(NickPrefix::Operator, "old");
        assert!(channel.rename_user("old", "new", NickPrefix::Operator));
        assert!(!channel.contains("old"));
        assert_eq!(channel.user_prefix("new"), Some(NickPrefix::Operator));
    }

    #[test]
    fn test_nicknames_match_ignoring_case() {
        let mut channel = Channel::new("#ufo", None);
        assert!(channel.add_user(NickPrefix::Voice, "Alice"));
        assert!(!channel.add_user(NickPrefix::None, "ALICE"));
        assert_eq!(channel.user_prefix("alice"), Some(NickPrefix::Voice));
        assert_eq!(channel.nicknames().collect::<Vec<_>>(), vec!["Alice"]);

        assert!(channel.rename_user("alice", "aLiCe", NickPrefix::Voice));
        assert_eq!(channel.nicknames().collect::<Vec<_>>(), vec!["aLiCe"]);

        assert!(channel.remove_user("alice"));
        assert!(channel.is_empty());
    }

    #[test]
    fn test_set_user_prefix() {
        let mut channel = Channel::new("#ufo", None);
        assert!(channel.set_user_prefix(NickPrefix::None, "carol"));
        assert!(!channel.set_user_prefix(NickPrefix::None, "carol"));
        assert!(channel.set_user_prefix(NickPrefix::Operator, "carol"));
        assert_eq!(channel.user_prefix("carol"), Some(NickPrefix::Operator));
    }

    #[test]
    fn test_display_order() {
        let mut channel = Channel::new("#ufo", None);
        channel.add_user(NickPrefix::None, "zed");
        channel.add_user(NickPrefix::Voice, "Yan");
        channel.add_user(NickPrefix::Operator, "mallory");
        channel.add_user(NickPrefix::None, "Bob");
        channel.add_user(NickPrefix::Operator, "alice");

        let shown: Vec<String> = channel.users().iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["@alice", "@mallory", "+Yan", "Bob", "zed"]);
    }

    #[test]
    fn test_empty_nick_ignored() {
        let mut channel = Channel::new("#ufo", None);
        assert!(!channel.add_user(NickPrefix::None, ""));
        assert!(channel.is_empty());
        assert!(channel.is_named("#UFO"));
    }
}
