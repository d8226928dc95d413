//! tickirc - terminal front end for the embeddable IRC client.
//!
//! Reads the configuration, connects, and maps stdin lines onto client
//! operations. Lines starting with `/` are commands; anything else is said
//! in the joined channel.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::Context as _;
use tickirc::config::validate;
use tickirc::{ChannelUser, ChatLog, Client, ClientError, Config, Host, TcpTransport};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Prints everything to the terminal and keeps the recent chat for `/history`.
struct TerminalHost {
    history: ChatLog,
}

impl Host for TerminalHost {
    fn append_chat_line(&mut self, text: &str) {
        println!("{text}");
        self.history.push(text);
    }

    fn refresh_user_list(&mut self, users: &[ChannelUser]) {
        let names: Vec<String> = users.iter().map(ToString::to_string).collect();
        println!("-- users: {}", names.join(" "));
    }

    fn play_notification_sound(&mut self) {
        print!("\x07");
    }

    fn nickname_rejected(&mut self, text: &str) {
        println!("-- nickname rejected ({text}), pick another with /nick");
    }

    fn game_invite(&mut self, host: &str, port: u16) {
        println!("-- game invite: {host}:{port}");
    }

    fn disconnected(&mut self, reason: &str) {
        println!("-- disconnected: {reason}");
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {config_path}", errors.len());
    }

    info!(
        host = %config.server.host,
        port = config.server.port,
        nickname = %config.identity.nickname,
        "Starting tickirc"
    );

    let input = spawn_stdin_reader();
    let host = TerminalHost {
        history: ChatLog::new(config.chat.history_bytes),
    };
    let mut client = Client::new(config, TcpTransport::new(), host);
    client
        .connect_configured()
        .context("could not connect to the configured server")?;

    loop {
        loop {
            match input.try_recv() {
                Ok(line) => {
                    if !run_line(&mut client, &line) {
                        client.disconnect("leaving");
                        return Ok(());
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    client.disconnect("leaving");
                    return Ok(());
                }
            }
        }

        match client.tick() {
            Ok(()) => {}
            Err(ClientError::NotConnected) => return Ok(()),
            Err(e) if e.is_fatal() => {
                warn!(error = %e, "Connection lost");
                return Ok(());
            }
            Err(e) => warn!(error = %e, "Tick failed"),
        }
        thread::sleep(TICK_INTERVAL);
    }
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run one input line. Returns `false` when the user asked to quit.
fn run_line(client: &mut Client<TcpTransport, TerminalHost>, line: &str) -> bool {
    let line = line.trim_end();
    if line.is_empty() {
        return true;
    }

    let Some(command) = line.strip_prefix('/') else {
        report(client.say(line));
        return true;
    };

    let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
    let rest = rest.trim();
    let mut args = rest.split_whitespace();
    let (first, second) = (args.next(), args.next());
    let after_first = rest
        .split_once(' ')
        .map(|(_, r)| r.trim())
        .filter(|r| !r.is_empty());

    let result = match (name.to_ascii_lowercase().as_str(), first) {
        ("quit", _) => {
            client.disconnect(if rest.is_empty() { "leaving" } else { rest });
            return false;
        }
        ("join", Some(channel)) => client.join(channel, second),
        ("part", Some(channel)) => client.part(channel),
        ("part", None) => match client.channel().map(|c| c.name().to_string()) {
            Some(channel) => client.part(&channel),
            None => Err(ClientError::NoChannel),
        },
        ("nick", Some(nick)) => client.nick(nick),
        ("msg", Some(target)) => client.privmsg(target, after_first.unwrap_or_default()),
        ("notice", Some(target)) => client.notice(target, after_first.unwrap_or_default()),
        ("mode", Some(target)) => match second {
            Some(modes) => {
                let params: Vec<&str> = args.collect();
                let params = params.join(" ");
                client.mode(target, modes, Some(params.as_str()).filter(|p| !p.is_empty()))
            }
            None => usage("/mode <target> <modes> [params]"),
        },
        ("topic", Some(_)) => match client.channel().map(|c| c.name().to_string()) {
            Some(channel) => client.set_topic(&channel, rest),
            None => Err(ClientError::NoChannel),
        },
        ("topic", None) => {
            match client.topic() {
                Some(topic) => println!("-- topic: {topic}"),
                None => println!("-- no channel joined"),
            }
            Ok(())
        }
        ("kick", Some(nick)) => match client.channel().map(|c| c.name().to_string()) {
            Some(channel) => client.kick(&channel, nick, after_first),
            None => Err(ClientError::NoChannel),
        },
        ("who", Some(mask)) => client.who(mask),
        ("whois", Some(nick)) => client.whois(nick),
        ("whowas", Some(nick)) => client.whowas(nick),
        ("invite", Some(host)) => match second.and_then(|p| p.parse::<u16>().ok()) {
            Some(port) => client.invite_to_game(host, port).map(|n| {
                println!("-- invited {n} user(s)");
            }),
            None => usage("/invite <host> <port>"),
        },
        ("history", _) => {
            println!("{}", client.host().history.text());
            Ok(())
        }
        ("names", _) => {
            match client.channel() {
                Some(channel) => {
                    let names: Vec<String> =
                        channel.users().iter().map(ToString::to_string).collect();
                    println!("-- {}: {}", channel.name(), names.join(" "));
                }
                None => println!("-- no channel joined"),
            }
            Ok(())
        }
        _ => usage(
            "commands: /join /part /nick /msg /notice /mode /topic /kick /who /whois /whowas /invite /names /history /quit",
        ),
    };
    report(result);
    true
}

fn usage(text: &str) -> tickirc::Result<()> {
    println!("-- {text}");
    Ok(())
}

fn report(result: tickirc::Result<()>) {
    if let Err(e) = result {
        println!("-- {e}");
    }
}
