//! Connection Handler
//!
//! Owns a stream and moves whole frames across it.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use bytes::Bytes;

use crate::config::Config;
use crate::error::Result;
use crate::protocol::{write_frame, FrameReader, REQUEST_TERMINATOR};

/// A framed connection to a peer
///
/// Generic over the stream so the framing can run over anything that reads
/// and writes; production code uses `TcpStream`.
pub struct Connection<S = TcpStream> {
    /// Underlying byte stream
    stream: S,

    /// Frame assembly state
    frames: FrameReader,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection<TcpStream> {
    /// Connect to `config.server_addr`
    ///
    /// Disables Nagle's algorithm and applies the configured timeouts.
    pub fn connect(config: &Config) -> Result<Self> {
        config.validate()?;

        tracing::debug!("Connecting to {}", config.server_addr);
        let stream = TcpStream::connect(&config.server_addr)?;

        Self::from_tcp(stream, config)
    }

    /// Wrap an accepted or connected TCP stream
    pub fn from_tcp(stream: TcpStream, config: &Config) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let mut connection = Self::from_stream(stream, config);
        connection.peer_addr = peer_addr;
        connection.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;
        Ok(connection)
    }

    /// Configure connection timeouts (0 disables)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.stream
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.stream
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Close both directions of the socket
    pub fn shutdown(&self) -> Result<()> {
        tracing::debug!("Closing connection to {}", self.peer_addr);
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // Already gone
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl<S: Read + Write> Connection<S> {
    /// Wrap any byte stream using the configured frame limits
    pub fn from_stream(stream: S, config: &Config) -> Self {
        Self {
            stream,
            frames: FrameReader::new(config.recv_chunk_size, config.max_frame_size),
            peer_addr: "stream".to_string(),
        }
    }

    /// Send a request payload followed by the request terminator
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.send_frame(payload, REQUEST_TERMINATOR)
    }

    /// Send a payload followed by an explicit terminator
    pub fn send_frame(&mut self, payload: &[u8], terminator: &[u8]) -> Result<()> {
        tracing::trace!("Sending {} bytes to {}", payload.len(), self.peer_addr);
        write_frame(&mut self.stream, payload, terminator)
    }

    /// Block until one complete frame has been received
    pub fn receive(&mut self) -> Result<Bytes> {
        let frame = self.frames.read_frame(&mut self.stream)?;
        tracing::trace!("Received {} byte frame from {}", frame.len(), self.peer_addr);
        Ok(frame)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Borrow the underlying stream
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}
