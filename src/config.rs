//! Configuration for slamlink
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, SlamError};

/// Main configuration for a client connection and the stub server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Client Configuration
    // -------------------------------------------------------------------------
    /// Mapping service address (host:port)
    pub server_addr: String,

    /// Connection read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,

    /// Bytes requested per socket read while assembling a frame
    pub recv_chunk_size: usize,

    /// Largest frame accepted before the read is abandoned (in bytes)
    pub max_frame_size: usize,

    // -------------------------------------------------------------------------
    // Session Recording
    // -------------------------------------------------------------------------
    /// Root directory for request/response dumps; `None` disables recording
    /// Internal structure:
    ///   {dump_dir}/
    ///     └── {unix_seconds}/
    ///           ├── {command}-request.json
    ///           └── {command}-response.json
    pub dump_dir: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Stub Server Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address for the canned-response stub
    pub listen_addr: String,

    /// Directory holding `{command}-response.json` fixtures
    pub fixture_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "192.168.11.1:1445".to_string(),
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            recv_chunk_size: 1024,
            max_frame_size: 64 * 1024 * 1024, // 64 MB
            dump_dir: None,
            listen_addr: "127.0.0.1:1445".to_string(),
            fixture_dir: PathBuf::from("./test_data"),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the framer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.recv_chunk_size == 0 {
            return Err(SlamError::Config("recv_chunk_size must be non-zero".to_string()));
        }
        if self.max_frame_size < self.recv_chunk_size {
            return Err(SlamError::Config(format!(
                "max_frame_size ({}) is smaller than recv_chunk_size ({})",
                self.max_frame_size, self.recv_chunk_size
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the mapping service address
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the per-read chunk size (in bytes)
    pub fn recv_chunk_size(mut self, size: usize) -> Self {
        self.config.recv_chunk_size = size;
        self
    }

    /// Set the maximum frame size (in bytes)
    pub fn max_frame_size(mut self, size: usize) -> Self {
        self.config.max_frame_size = size;
        self
    }

    /// Enable session recording under the given directory
    pub fn dump_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dump_dir = Some(path.into());
        self
    }

    /// Set the stub server listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the stub server fixture directory
    pub fn fixture_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.fixture_dir = path.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
