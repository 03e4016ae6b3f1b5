//! Console Server
//!
//! Line-based JSON command protocol on a local TCP port. The listener and
//! every client socket are non-blocking; the build loop services them once
//! per tick, so no extra thread is involved.
//!
//! Request: `{"command": "profile", "args": ["release"]}`
//! Reply:   `{"type": "log_msg", "level": "info", "msg": "..."}`

use std::io::{ErrorKind, Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};

use serde::Deserialize;

use crate::error::{MasonError, MasonResult};

/// Longest pending command line a client may send
const MAX_LINE_LEN: usize = 64 * 1024;

/// Commands accepted on the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    FullRebuild,
    Scan,
    Profile(String),
    StringIdLookup(String),
}

#[derive(Debug, Deserialize)]
struct RawCommand {
    command: String,
    #[serde(default)]
    args: Vec<String>,
}

impl ConsoleCommand {
    /// Parse one request line
    pub fn parse(line: &str) -> Result<Self, String> {
        let raw: RawCommand =
            serde_json::from_str(line).map_err(|e| format!("malformed command: {e}"))?;
        let arg = |name: &str| {
            raw.args
                .first()
                .cloned()
                .ok_or_else(|| format!("'{}' expects a {name} argument", raw.command))
        };
        match raw.command.as_str() {
            "full_rebuild" => Ok(ConsoleCommand::FullRebuild),
            "scan" => Ok(ConsoleCommand::Scan),
            "profile" => Ok(ConsoleCommand::Profile(arg("profile name")?)),
            "string_id_lookup" => Ok(ConsoleCommand::StringIdLookup(arg("string id")?)),
            other => Err(format!("unknown command '{other}'")),
        }
    }
}

/// Severity attached to console replies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyLevel {
    Info,
    Warning,
    Error,
}

impl ReplyLevel {
    fn as_str(self) -> &'static str {
        match self {
            ReplyLevel::Info => "info",
            ReplyLevel::Warning => "warning",
            ReplyLevel::Error => "error",
        }
    }
}

struct Client {
    stream: TcpStream,
    buffer: Vec<u8>,
    closed: bool,
}

impl Client {
    /// Read whatever is available and split off complete lines.
    ///
    /// A client whose pending line grows past `MAX_LINE_LEN` gets an error
    /// reply and is closed.
    fn read_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => {
                    self.closed = true;
                    break;
                }
                Ok(n) => {
                    self.buffer.extend_from_slice(&chunk[..n]);
                    self.split_lines(&mut lines);
                    if self.buffer.len() > MAX_LINE_LEN {
                        tracing::warn!(len = self.buffer.len(), "Console line too long, dropping client");
                        self.send(&reply_line(ReplyLevel::Error, "Command line too long"));
                        self.buffer.clear();
                        self.closed = true;
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::debug!("Console client dropped: {e}");
                    self.closed = true;
                    break;
                }
            }
        }
        lines
    }

    fn split_lines(&mut self, lines: &mut Vec<String>) {
        while let Some(end) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=end).collect();
            let line = String::from_utf8_lossy(&line).trim().to_string();
            if !line.is_empty() {
                lines.push(line);
            }
        }
    }

    fn send(&mut self, line: &str) {
        let written = self
            .stream
            .write_all(line.as_bytes())
            .and_then(|()| self.stream.write_all(b"\n"));
        if written.is_err() {
            self.closed = true;
        }
    }
}

/// Non-blocking command listener
pub struct ConsoleServer {
    listener: TcpListener,
    clients: Vec<Client>,
}

impl ConsoleServer {
    /// Listen on `127.0.0.1:port`; port 0 picks a free port.
    pub fn bind(port: u16) -> MasonResult<Self> {
        let console_error = |source| MasonError::Console { port, source };
        let listener =
            TcpListener::bind((Ipv4Addr::LOCALHOST, port)).map_err(console_error)?;
        listener.set_nonblocking(true).map_err(console_error)?;
        tracing::info!(port, "Console server listening");
        Ok(Self {
            listener,
            clients: Vec::new(),
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr().ok()
    }

    /// Accept pending connections and collect every complete command.
    ///
    /// Malformed requests are answered with an error reply and dropped.
    pub fn poll(&mut self) -> Vec<ConsoleCommand> {
        self.accept();

        let mut commands = Vec::new();
        for client in &mut self.clients {
            for line in client.read_lines() {
                match ConsoleCommand::parse(&line) {
                    Ok(command) => commands.push(command),
                    Err(message) => client.send(&reply_line(ReplyLevel::Error, &message)),
                }
            }
        }
        self.clients.retain(|client| !client.closed);
        commands
    }

    /// Send a reply to every connected client
    pub fn reply(&mut self, level: ReplyLevel, message: &str) {
        let line = reply_line(level, message);
        for client in &mut self.clients {
            client.send(&line);
        }
        self.clients.retain(|client| !client.closed);
    }

    fn accept(&mut self) {
        loop {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    if let Err(e) = stream.set_nonblocking(true) {
                        tracing::warn!("Failed to configure console client {addr}: {e}");
                        continue;
                    }
                    tracing::debug!("Console client connected from {addr}");
                    self.clients.push(Client {
                        stream,
                        buffer: Vec::new(),
                        closed: false,
                    });
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => {
                    tracing::warn!("Console accept failed: {e}");
                    break;
                }
            }
        }
    }
}

fn reply_line(level: ReplyLevel, message: &str) -> String {
    serde_json::json!({
        "type": "log_msg",
        "level": level.as_str(),
        "msg": message,
    })
    .to_string()
}
