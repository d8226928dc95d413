//! IRC numeric reply codes.
//!
//! Covers the replies an ordinary client meets during registration, channel
//! membership and WHOIS/WHO/WHOWAS queries, plus the RFC 2812 error range.
//! Numerics outside the table still parse as [`CommandId::Numeric`] and are
//! handled generically.
//!
//! [`CommandId::Numeric`]: crate::message::CommandId::Numeric

#![allow(non_camel_case_types)]

macro_rules! responses {
    ($( $(#[$doc:meta])* $name:ident = $code:literal, )*) => {
        /// IRC server response code.
        ///
        /// - 001-099: connection/registration
        /// - 200-399: command replies
        /// - 400-599: error replies
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u16)]
        #[non_exhaustive]
        pub enum Response {
            $( $(#[$doc])* $name = $code, )*
        }

        impl Response {
            /// Look up a numeric code.
            pub fn from_u16(code: u16) -> Option<Self> {
                match code {
                    $( $code => Some(Self::$name), )*
                    _ => None,
                }
            }
        }
    };
}

responses! {
    /// 001 - Welcome to the IRC network
    RPL_WELCOME = 1,
    /// 002 - Your host is running version
    RPL_YOURHOST = 2,
    /// 003 - Server creation date
    RPL_CREATED = 3,
    /// 004 - Server name, version and supported modes
    RPL_MYINFO = 4,
    /// 005 - Server supported features
    RPL_ISUPPORT = 5,
    /// 020 - Connection greeting sent before registration
    RPL_HELLO = 20,
    /// 251 - User count summary
    RPL_LUSERCLIENT = 251,
    /// 252 - Operators online
    RPL_LUSEROP = 252,
    /// 253 - Unknown connections
    RPL_LUSERUNKNOWN = 253,
    /// 254 - Channels formed
    RPL_LUSERCHANNELS = 254,
    /// 255 - Local clients and servers
    RPL_LUSERME = 255,
    /// 265 - Local user count
    RPL_LOCALUSERS = 265,
    /// 266 - Global user count
    RPL_GLOBALUSERS = 266,
    /// 301 - User is away
    RPL_AWAY = 301,
    /// 305 - No longer away
    RPL_UNAWAY = 305,
    /// 306 - Now away
    RPL_NOWAWAY = 306,
    /// 311 - WHOIS user
    RPL_WHOISUSER = 311,
    /// 312 - WHOIS server
    RPL_WHOISSERVER = 312,
    /// 313 - WHOIS operator
    RPL_WHOISOPERATOR = 313,
    /// 314 - WHOWAS user
    RPL_WHOWASUSER = 314,
    /// 315 - End of WHO
    RPL_ENDOFWHO = 315,
    /// 317 - WHOIS idle time
    RPL_WHOISIDLE = 317,
    /// 318 - End of WHOIS
    RPL_ENDOFWHOIS = 318,
    /// 319 - WHOIS channels
    RPL_WHOISCHANNELS = 319,
    /// 324 - Channel modes
    RPL_CHANNELMODEIS = 324,
    /// 330 - WHOIS account
    RPL_WHOISACCOUNT = 330,
    /// 331 - No topic set
    RPL_NOTOPIC = 331,
    /// 332 - Channel topic
    RPL_TOPIC = 332,
    /// 333 - Topic setter and time
    RPL_TOPICWHOTIME = 333,
    /// 341 - Invite sent
    RPL_INVITING = 341,
    /// 351 - Server version
    RPL_VERSION = 351,
    /// 352 - WHO reply
    RPL_WHOREPLY = 352,
    /// 353 - NAMES reply
    RPL_NAMREPLY = 353,
    /// 366 - End of NAMES
    RPL_ENDOFNAMES = 366,
    /// 369 - End of WHOWAS
    RPL_ENDOFWHOWAS = 369,
    /// 372 - MOTD line
    RPL_MOTD = 372,
    /// 375 - MOTD start
    RPL_MOTDSTART = 375,
    /// 376 - End of MOTD
    RPL_ENDOFMOTD = 376,
    /// 391 - Server time
    RPL_TIME = 391,
    /// 401 - No such nick
    ERR_NOSUCHNICK = 401,
    /// 402 - No such server
    ERR_NOSUCHSERVER = 402,
    /// 403 - No such channel
    ERR_NOSUCHCHANNEL = 403,
    /// 404 - Cannot send to channel
    ERR_CANNOTSENDTOCHAN = 404,
    /// 405 - Too many channels
    ERR_TOOMANYCHANNELS = 405,
    /// 406 - There was no such nick
    ERR_WASNOSUCHNICK = 406,
    /// 411 - No recipient
    ERR_NORECIPIENT = 411,
    /// 412 - No text to send
    ERR_NOTEXTTOSEND = 412,
    /// 421 - Unknown command
    ERR_UNKNOWNCOMMAND = 421,
    /// 422 - MOTD missing
    ERR_NOMOTD = 422,
    /// 431 - No nickname given
    ERR_NONICKNAMEGIVEN = 431,
    /// 432 - Erroneous nickname
    ERR_ERRONEUSNICKNAME = 432,
    /// 433 - Nickname in use
    ERR_NICKNAMEINUSE = 433,
    /// 436 - Nickname collision
    ERR_NICKCOLLISION = 436,
    /// 437 - Cannot change nick while banned
    ERR_BANNICKCHANGE = 437,
    /// 438 - Nick change too fast
    ERR_NCHANGETOOFAST = 438,
    /// 441 - User not in channel
    ERR_USERNOTINCHANNEL = 441,
    /// 442 - Not on channel
    ERR_NOTONCHANNEL = 442,
    /// 443 - User already on channel
    ERR_USERONCHANNEL = 443,
    /// 451 - Not registered
    ERR_NOTREGISTERED = 451,
    /// 461 - Need more params
    ERR_NEEDMOREPARAMS = 461,
    /// 462 - Already registered
    ERR_ALREADYREGISTRED = 462,
    /// 464 - Password mismatch
    ERR_PASSWDMISMATCH = 464,
    /// 465 - Banned from server
    ERR_YOUREBANNEDCREEP = 465,
    /// 471 - Channel is full
    ERR_CHANNELISFULL = 471,
    /// 472 - Unknown mode
    ERR_UNKNOWNMODE = 472,
    /// 473 - Invite only channel
    ERR_INVITEONLYCHAN = 473,
    /// 474 - Banned from channel
    ERR_BANNEDFROMCHAN = 474,
    /// 475 - Bad channel key
    ERR_BADCHANNELKEY = 475,
    /// 481 - No privileges
    ERR_NOPRIVILEGES = 481,
    /// 482 - Channel operator privileges needed
    ERR_CHANOPRIVSNEEDED = 482,
    /// 501 - Unknown user mode flag
    ERR_UMODEUNKNOWNFLAG = 501,
    /// 502 - Cannot change mode for other users
    ERR_USERSDONTMATCH = 502,
}

impl Response {
    /// Numeric code of this response.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Whether `code` is in the error range (400-599).
    pub fn is_error_code(code: u16) -> bool {
        (400..600).contains(&code)
    }

    /// Whether this response is an error reply.
    pub fn is_error(self) -> bool {
        Self::is_error_code(self.code())
    }

    /// Whether this error means the server refused our nickname.
    pub fn is_nickname_error(self) -> bool {
        matches!(
            self,
            Self::ERR_NOSUCHNICK
                | Self::ERR_NONICKNAMEGIVEN
                | Self::ERR_ERRONEUSNICKNAME
                | Self::ERR_NICKNAMEINUSE
                | Self::ERR_NICKCOLLISION
        )
    }
}
