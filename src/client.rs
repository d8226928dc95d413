//! Connection driver.
//!
//! [`Client`] owns the transport, the send queue, the session and the
//! receive buffer, and moves them through the connection lifecycle. It is
//! poll-driven: the embedding application calls [`Client::tick`] regularly
//! and nothing blocks after `connect`.

use std::time::Instant;

use bytes::BytesMut;
use tickirc_proto::{Command, IrcCodec, ServerMessage};
use tokio_util::codec::Decoder;
use tracing::{Span, debug, info, warn};

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::handlers::{Context, GameInvite, Outcome, Registry};
use crate::host::{Host, deliver_chat};
use crate::network::{OutboundMessage, SendQueue, Transport};
use crate::state::{Channel, ConnectionState, Session};
use crate::telemetry::spans;

/// Bytes requested from the transport per read.
const READ_CHUNK: usize = 4096;

/// Most bytes pulled from the transport in one tick. The rest waits for the
/// next tick, so the receive buffer stays bounded even when the peer never
/// sends a line break.
const MAX_READ_PER_TICK: usize = 16 * READ_CHUNK;

/// An IRC client bound to one transport and one host.
pub struct Client<T: Transport, H: Host> {
    config: Config,
    transport: T,
    host: H,
    state: ConnectionState,
    session: Session,
    queue: SendQueue,
    codec: IrcCodec,
    recv_buf: BytesMut,
    urgent: Vec<OutboundMessage>,
    registry: Registry,
    span: Span,
}

impl<T: Transport, H: Host> Client<T, H> {
    pub fn new(config: Config, transport: T, host: H) -> Self {
        let session = Session::new(config.identity.nickname.as_str());
        let queue = SendQueue::new(&config.rate_limit, Instant::now());
        let codec = IrcCodec::with_max_len(config.chat.max_line_len);
        Self {
            config,
            transport,
            host,
            state: ConnectionState::Disconnected,
            session,
            queue,
            codec,
            recv_buf: BytesMut::with_capacity(READ_CHUNK),
            urgent: Vec::new(),
            registry: Registry::new(),
            span: Span::none(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn queue(&self) -> &SendQueue {
        &self.queue
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Our current nickname as the server knows it.
    pub fn local_nickname(&self) -> &str {
        self.session.nickname()
    }

    pub fn channel(&self) -> Option<&Channel> {
        self.session.channel()
    }

    /// Topic of the joined channel.
    pub fn topic(&self) -> Option<&str> {
        self.session.channel().map(Channel::topic)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Connect and register with NICK/USER (and PASS when configured).
    pub fn connect(&mut self, host: &str, port: u16) -> Result<()> {
        self.connect_at(host, port, Instant::now())
    }

    /// [`connect`](Self::connect) with an explicit clock.
    pub fn connect_at(&mut self, host: &str, port: u16, now: Instant) -> Result<()> {
        if self.state != ConnectionState::Disconnected {
            return Err(ClientError::AlreadyConnected);
        }

        self.span = spans::connection(host, port);
        let span = self.span.clone();
        let _enter = span.enter();

        self.state = ConnectionState::Connecting;
        info!("Connecting");
        if let Err(e) = self.transport.connect(host, port) {
            warn!(error = %e, "Connect failed");
            self.state = ConnectionState::Disconnected;
            return Err(e.into());
        }

        self.queue.reset(now);
        self.codec.reset();
        self.recv_buf.clear();
        self.urgent.clear();
        self.session.reset(self.config.identity.nickname.as_str());

        if let Err(e) = self.register(now) {
            return Err(self.fail(e));
        }

        self.state = ConnectionState::Connected;
        info!(nickname = %self.session.nickname(), "Connected");
        Ok(())
    }

    /// Connect to the configured server, then join the configured channel.
    pub fn connect_configured(&mut self) -> Result<()> {
        let host = self.config.server.host.clone();
        let port = self.config.server.port;
        self.connect(&host, port)?;

        if let Some(channel) = self.config.server.channel.clone() {
            let key = self.config.server.channel_key.clone();
            self.join(&channel, key.as_deref())?;
        }
        Ok(())
    }

    fn register(&mut self, now: Instant) -> Result<()> {
        let identity = &self.config.identity;
        let mut commands = Vec::with_capacity(3);
        if let Some(password) = &self.config.server.password {
            commands.push(Command::Pass(password.clone()));
        }
        commands.push(Command::Nick(identity.nickname.clone()));
        commands.push(Command::User {
            user: identity.username().to_string(),
            invisible: identity.invisible,
            realname: identity.realname().to_string(),
        });

        for command in commands {
            self.queue.enqueue(OutboundMessage::encode(&command)?)?;
        }
        self.flush(now)
    }

    /// Leave the server. Sends QUIT outside the rate limiter, then tears
    /// everything down. Does nothing when already disconnected.
    pub fn disconnect(&mut self, reason: &str) {
        if self.state == ConnectionState::Disconnected {
            return;
        }

        let quit = Command::Quit(Some(reason).filter(|r| !r.is_empty()).map(str::to_string));
        match OutboundMessage::encode(&quit) {
            Ok(message) => {
                if let Err(e) = self.transport.send(message.payload()) {
                    debug!(error = %e, "QUIT not delivered");
                }
            }
            Err(e) => debug!(error = %e, "QUIT not encodable"),
        }
        self.teardown(reason);
    }

    /// One poll step: flush the send queue, read what the transport has,
    /// and dispatch every complete line.
    pub fn tick(&mut self) -> Result<()> {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Self::tick) with an explicit clock.
    pub fn tick_at(&mut self, now: Instant) -> Result<()> {
        if !self.state.is_connected() {
            return Err(ClientError::NotConnected);
        }
        let span = self.span.clone();
        let _enter = span.enter();

        if let Err(e) = self.flush(now) {
            return Err(self.fail(e));
        }
        if let Err(e) = self.fill_recv_buf() {
            return Err(self.fail(e));
        }

        loop {
            let msg = match self.codec.decode(&mut self.recv_buf) {
                Ok(Some(msg)) => msg,
                Ok(None) => break,
                Err(e) => return Err(self.fail(e.into())),
            };

            let outcome = self.dispatch(&msg, now);
            if let Err(e) = self.send_urgent() {
                return Err(self.fail(e));
            }
            if let Outcome::Disconnect(reason) = outcome {
                self.teardown(&reason);
                return Err(ClientError::Closed(reason));
            }
        }
        Ok(())
    }

    fn fill_recv_buf(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK];
        let mut read = 0;
        while read < MAX_READ_PER_TICK {
            let n = self.transport.recv(&mut chunk)?;
            self.recv_buf.extend_from_slice(&chunk[..n]);
            read += n;
            if n < READ_CHUNK {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: &ServerMessage, now: Instant) -> Outcome {
        let mut ctx = Context {
            session: &mut self.session,
            queue: &mut self.queue,
            host: &mut self.host,
            config: &self.config,
            urgent: &mut self.urgent,
            now,
        };
        self.registry.dispatch(&mut ctx, msg)
    }

    fn send_urgent(&mut self) -> Result<()> {
        for message in self.urgent.drain(..) {
            self.transport.send(message.payload())?;
        }
        Ok(())
    }

    fn flush(&mut self, now: Instant) -> Result<()> {
        let transport = &mut self.transport;
        let report = self.queue.flush(now, |data| transport.send(data))?;
        for message in report.evicted {
            self.chat(&format!(
                "Message too long to send, dropped: {}",
                message.as_text()
            ));
        }
        Ok(())
    }

    /// Log `err`, tear the connection down and hand the error back.
    fn fail(&mut self, err: ClientError) -> ClientError {
        warn!(error = %err, code = err.error_code(), "Connection failed");
        self.teardown(&err.to_string());
        err
    }

    fn teardown(&mut self, reason: &str) {
        self.transport.close();
        self.queue.clear();
        self.recv_buf.clear();
        self.codec.reset();
        self.urgent.clear();
        if self.session.leave().is_some() {
            self.host.refresh_user_list(&[]);
        }
        self.state = ConnectionState::Disconnected;
        info!(reason, "Disconnected");
        self.host.disconnected(reason);
        self.span = Span::none();
    }

    fn chat(&mut self, line: &str) {
        deliver_chat(&mut self.host, &self.config.chat, line);
    }

    // ========================================================================
    // Outbound operations
    // ========================================================================

    fn ensure_connected(&self) -> Result<()> {
        if self.state.is_connected() {
            Ok(())
        } else {
            Err(ClientError::NotConnected)
        }
    }

    fn enqueue(&mut self, command: Command) -> Result<()> {
        self.ensure_connected()?;
        self.queue.enqueue(OutboundMessage::encode(&command)?)?;
        Ok(())
    }

    fn joined_channel(&self) -> Result<String> {
        self.session
            .channel()
            .map(|c| c.name().to_string())
            .ok_or(ClientError::NoChannel)
    }

    /// Join `channel`. Only one channel can be joined at a time.
    pub fn join(&mut self, channel: &str, key: Option<&str>) -> Result<()> {
        self.ensure_connected()?;
        let key = key.filter(|k| !k.is_empty()).map(str::to_string);
        self.session.join(channel, key.clone())?;

        let command = Command::Join {
            channel: channel.to_string(),
            key,
        };
        if let Err(e) = self.enqueue(command) {
            self.session.leave();
            return Err(e);
        }
        debug!(channel, "Joining");
        Ok(())
    }

    /// Leave `channel`. The channel is dropped locally right away.
    pub fn part(&mut self, channel: &str) -> Result<()> {
        self.ensure_connected()?;
        let channel = self.session.part(channel)?;
        self.host.refresh_user_list(&[]);
        self.enqueue(Command::Part(channel.name().to_string()))
    }

    /// Say `text` in the joined channel, echoing it locally.
    pub fn say(&mut self, text: &str) -> Result<()> {
        let channel = self.joined_channel()?;
        self.enqueue(Command::Privmsg(channel, text.to_string()))?;
        let line = format!("<{}> {text}", self.session.nickname());
        self.chat(&line);
        Ok(())
    }

    /// Ask the server for a new nickname. The local nickname changes once
    /// the server confirms with NICK.
    pub fn nick(&mut self, nickname: &str) -> Result<()> {
        self.enqueue(Command::Nick(nickname.to_string()))
    }

    pub fn privmsg(&mut self, target: &str, text: &str) -> Result<()> {
        self.enqueue(Command::Privmsg(target.to_string(), text.to_string()))
    }

    pub fn notice(&mut self, target: &str, text: &str) -> Result<()> {
        self.enqueue(Command::Notice(target.to_string(), text.to_string()))
    }

    pub fn mode(&mut self, target: &str, modes: &str, params: Option<&str>) -> Result<()> {
        self.enqueue(Command::Mode {
            target: target.to_string(),
            modes: modes.to_string(),
            params: params.map(str::to_string),
        })
    }

    pub fn set_topic(&mut self, channel: &str, topic: &str) -> Result<()> {
        self.enqueue(Command::Topic {
            channel: channel.to_string(),
            topic: topic.to_string(),
        })
    }

    pub fn kick(&mut self, channel: &str, nick: &str, reason: Option<&str>) -> Result<()> {
        self.enqueue(Command::Kick {
            channel: channel.to_string(),
            nick: nick.to_string(),
            reason: reason.map(str::to_string),
        })
    }

    pub fn who(&mut self, mask: &str) -> Result<()> {
        self.enqueue(Command::Who(mask.to_string()))
    }

    pub fn whois(&mut self, nick: &str) -> Result<()> {
        self.enqueue(Command::Whois(nick.to_string()))
    }

    pub fn whowas(&mut self, nick: &str) -> Result<()> {
        self.enqueue(Command::Whowas(nick.to_string()))
    }

    /// Invite everyone else in the joined channel to the game server at
    /// `host:port`. Returns how many invites were queued.
    pub fn invite_to_game(&mut self, host: &str, port: u16) -> Result<usize> {
        self.ensure_connected()?;
        let channel = self.session.channel().ok_or(ClientError::NoChannel)?;
        let body = GameInvite::new(host, port, Some(self.config.identity.version.clone())).to_string();
        let targets: Vec<String> = channel
            .nicknames()
            .filter(|nick| !self.session.is_me(nick))
            .map(str::to_string)
            .collect();

        for nick in &targets {
            self.enqueue(Command::Privmsg(nick.clone(), body.clone()))?;
        }
        info!(invited = targets.len(), host, port, "Game invites queued");
        Ok(targets.len())
    }
}
