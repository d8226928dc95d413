//! Wire serialization for outbound commands.

use std::fmt::{self, Display, Formatter, Write};

use super::Command;

/// Write `:text` as the final argument.
fn write_trailing(f: &mut Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str(" :")?;
    f.write_str(text)
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;

        match self {
            Command::Pass(arg) | Command::Nick(arg) | Command::Part(arg) => {
                write!(f, " {}", arg)?;
            }
            Command::Who(mask) | Command::Whois(mask) | Command::Whowas(mask) => {
                write!(f, " {}", mask)?;
            }
            Command::User {
                user,
                invisible,
                realname,
            } => {
                let mode = if *invisible { '8' } else { '0' };
                write!(f, " {} {} *", user, mode)?;
                write_trailing(f, realname)?;
            }
            Command::Join { channel, key } => {
                write!(f, " {}", channel)?;
                if let Some(key) = key {
                    write!(f, " {}", key)?;
                }
            }
            Command::Mode {
                target,
                modes,
                params,
            } => {
                write!(f, " {} {}", target, modes)?;
                if let Some(params) = params.as_deref().filter(|p| !p.is_empty()) {
                    write!(f, " {}", params)?;
                }
            }
            Command::Topic { channel, topic } => {
                write!(f, " {}", channel)?;
                write_trailing(f, topic)?;
            }
            Command::Privmsg(target, text) | Command::Notice(target, text) => {
                write!(f, " {}", target)?;
                write_trailing(f, text)?;
            }
            Command::Kick {
                channel,
                nick,
                reason,
            } => {
                write!(f, " {} {}", channel, nick)?;
                if let Some(reason) = reason {
                    write_trailing(f, reason)?;
                }
            }
            Command::Quit(reason) => {
                if let Some(reason) = reason {
                    write_trailing(f, reason)?;
                }
            }
            Command::Pong(token) => {
                write_trailing(f, token)?;
            }
        }

        f.write_char('\r')?;
        f.write_char('\n')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_lines() {
        assert_eq!(Command::Pass("secret".into()).to_string(), "PASS secret\r\n");
        assert_eq!(Command::Nick("player".into()).to_string(), "NICK player\r\n");
        assert_eq!(
            Command::User {
                user: "player".into(),
                invisible: true,
                realname: "UFO player".into(),
            }
            .to_string(),
            "USER player 8 * :UFO player\r\n"
        );
        assert_eq!(
            Command::User {
                user: "p".into(),
                invisible: false,
                realname: "p".into(),
            }
            .to_string(),
            "USER p 0 * :p\r\n"
        );
    }

    #[test]
    fn test_channel_commands() {
        assert_eq!(
            Command::Join {
                channel: "#ufo".into(),
                key: None
            }
            .to_string(),
            "JOIN #ufo\r\n"
        );
        assert_eq!(
            Command::Join {
                channel: "#ufo".into(),
                key: Some("k3y".into())
            }
            .to_string(),
            "JOIN #ufo k3y\r\n"
        );
        assert_eq!(Command::Part("#ufo".into()).to_string(), "PART #ufo\r\n");
        assert_eq!(
            Command::Topic {
                channel: "#ufo".into(),
                topic: "new topic".into()
            }
            .to_string(),
            "TOPIC #ufo :new topic\r\n"
        );
        assert_eq!(
            Command::Kick {
                channel: "#ufo".into(),
                nick: "bob".into(),
                reason: Some("bye".into())
            }
            .to_string(),
            "KICK #ufo bob :bye\r\n"
        );
        assert_eq!(
            Command::Mode {
                target: "#ufo".into(),
                modes: "+o".into(),
                params: Some("bob".into())
            }
            .to_string(),
            "MODE #ufo +o bob\r\n"
        );
    }

    #[test]
    fn test_misc_commands() {
        assert_eq!(Command::Quit(None).to_string(), "QUIT\r\n");
        assert_eq!(
            Command::Quit(Some("leaving".into())).to_string(),
            "QUIT :leaving\r\n"
        );
        assert_eq!(Command::Pong("irc.x".into()).to_string(), "PONG :irc.x\r\n");
        assert_eq!(Command::Whois("bob".into()).to_string(), "WHOIS bob\r\n");
        assert_eq!(
            Command::Notice("bob".into(), "hi".into()).to_string(),
            "NOTICE bob :hi\r\n"
        );
    }
}
