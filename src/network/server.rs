//! Canned-response stub server
//!
//! Answers each request with a fixture file so clients can be exercised
//! without a robot. Serves one connection at a time.

use std::fs;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::Connection;
use crate::config::Config;
use crate::error::{Result, SlamError};
use crate::protocol::{decode_request, CommandType, RESPONSE_TERMINATOR};

/// How long the accept loop sleeps between shutdown checks
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// TCP stub answering from `{fixture_dir}/{command}-response.json`
pub struct StubServer {
    config: Config,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

/// Handle for stopping a running server from another thread
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Signal the server to stop after the current connection
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

impl StubServer {
    /// Bind to `config.listen_addr`
    pub fn bind(config: Config) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;

        tracing::info!(
            "Stub listening on {} (fixtures in {})",
            listener.local_addr()?,
            config.fixture_dir.display()
        );

        Ok(Self {
            config,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Accept and serve connections until shutdown (blocking)
    pub fn run(&self) -> Result<()> {
        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    tracing::info!("Connection from {}", addr);
                    if let Err(e) = self.handle_connection(stream) {
                        tracing::warn!("Connection from {} failed: {}", addr, e);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!("Stub server stopped");
        Ok(())
    }

    /// Serve one client until it disconnects or asks for an unknown fixture
    fn handle_connection(&self, stream: TcpStream) -> Result<()> {
        stream.set_nonblocking(false)?;
        let mut connection = Connection::from_tcp(stream, &self.config)?;

        loop {
            let frame = match connection.receive() {
                Ok(frame) => frame,
                Err(e) if e.is_connection_lost() => {
                    tracing::debug!("Connection end: {}", e);
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            let reply = match self.answer(&frame) {
                Ok(Some(reply)) => reply,
                Ok(None) => return Ok(()),
                Err(e) => {
                    tracing::warn!("Dropping connection from {}: {}", connection.peer_addr(), e);
                    return Ok(());
                }
            };

            match connection.send_frame(&reply, RESPONSE_TERMINATOR) {
                Ok(()) => {}
                Err(e) if e.is_connection_lost() => {
                    tracing::debug!("Client left before the response was sent: {}", e);
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Build the response payload for one request frame
    ///
    /// Returns `None` when no fixture exists for the command.
    pub fn answer(&self, frame: &[u8]) -> Result<Option<Vec<u8>>> {
        let request = decode_request(frame)?;
        tracing::debug!("In: {} (id={})", request.command, request.request_id);

        if CommandType::from_name(&request.command).is_none() {
            tracing::debug!("Command {} is not in the client catalog", request.command);
        }

        let path = fixture_path(&self.config.fixture_dir, &request.command);
        if !path.exists() {
            tracing::warn!("{} not found", path.display());
            return Ok(None);
        }

        let mut fixture: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        let envelope = fixture.as_object_mut().ok_or_else(|| {
            SlamError::Protocol(format!("{} is not a JSON object", path.display()))
        })?;
        envelope.insert("request_id".to_string(), Value::from(request.request_id));

        tracing::debug!("Out: {} (id={})", request.command, request.request_id);
        Ok(Some(serde_json::to_vec(&fixture)?))
    }
}

/// Location of the canned response for a command
pub fn fixture_path(dir: &Path, command: &str) -> PathBuf {
    dir.join(format!("{}-response.json", command))
}
