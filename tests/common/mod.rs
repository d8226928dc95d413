//! Integration test common infrastructure.
//!
//! Provides a host that records every callback, a scripted server over the
//! in-memory transport, and helpers that bring a client to a known state.

pub mod host;
pub mod server;

use std::time::{Duration, Instant};

use tickirc::{Client, Config, MemoryTransport};

#[allow(unused_imports)]
pub use host::RecordingHost;
#[allow(unused_imports)]
pub use server::TestServer;

#[allow(dead_code)]
pub type TestClient = Client<MemoryTransport, RecordingHost>;

/// Nickname every test client starts with.
#[allow(dead_code)]
pub const NICK: &str = "commander";

#[allow(dead_code)]
pub fn config() -> Config {
    Config::new("irc.test", 6667, NICK)
}

/// A disconnected client and the server end of its wire.
#[allow(dead_code)]
pub fn client_with(config: Config) -> (TestClient, TestServer) {
    let server = TestServer::new();
    let client = Client::new(config, server.transport(), RecordingHost::default());
    (client, server)
}

/// A connected client whose registration lines were already consumed.
#[allow(dead_code)]
pub fn connected() -> (TestClient, TestServer) {
    let (mut client, server) = client_with(config());
    client
        .connect("irc.test", 6667)
        .expect("connect over memory transport");
    server.sent();
    (client, server)
}

/// A connected client that has joined `channel` and seen a NAMES reply
/// listing `names` (plus ourselves).
#[allow(dead_code)]
pub fn joined(channel: &str, names: &str) -> (TestClient, TestServer) {
    let (mut client, server) = connected();
    client.join(channel, None).expect("join");
    client.tick().expect("tick");
    server.sent();

    server.send(&format!(":{NICK}!u@h JOIN :{channel}"));
    server.send(&format!(":srv 353 {NICK} = {channel} :{NICK} {names}"));
    server.send(&format!(":srv 366 {NICK} {channel} :End of /NAMES list."));
    client.tick().expect("tick");
    client.host_mut().clear();
    (client, server)
}

/// Feed `line` to the client and tick until replies are flushed.
#[allow(dead_code)]
pub fn exchange(client: &mut TestClient, server: &TestServer, line: &str) -> Vec<String> {
    server.send(line);
    client.tick().expect("tick");
    client.tick().expect("tick");
    server.sent()
}

/// An instant `secs` seconds after `base`.
#[allow(dead_code)]
pub fn later(base: Instant, secs: u64) -> Instant {
    base + Duration::from_secs(secs)
}
