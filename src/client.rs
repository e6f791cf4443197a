//! Command Client
//!
//! Named operations over a single framed connection.
//!
//! ## Request Lifecycle
//! ```text
//!  Command ──► Correlator (stamp id) ──► Connection::send
//!                                              │
//!  typed result ◄── code check ◄── id check ◄── Connection::receive
//!                                              (string result unwrapped)
//! ```
//!
//! One request is in flight at a time. A response with the wrong id or a
//! failure code is returned as an error; the connection stays usable.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::{Result, SlamError};
use crate::network::Connection;
use crate::payload::{self, Grid, LaserSample};
use crate::protocol::{
    decode_response, encode_request, parse_result, Area, Command, CommandAck, Correlator,
    KnownArea, MapQuery, Pose, RawLaserScan, RawMapData, Request,
};
use crate::recorder::SessionRecorder;

/// Decoded `getmapdata` result
#[derive(Debug, Clone, PartialEq)]
pub struct MapData {
    /// Area the map was requested for
    pub area: Area,
    pub dimension_x: usize,
    pub dimension_y: usize,
    /// Cell edge length in meters
    pub resolution: f64,
    pub grid: Grid,
    /// Result fields not covered above
    pub extra: Map<String, Value>,
}

impl MapData {
    /// Map extent in meters (x, y)
    pub fn size_meters(&self) -> (f64, f64) {
        (
            self.dimension_x as f64 * self.resolution,
            self.dimension_y as f64 * self.resolution,
        )
    }
}

/// Client for the mapping service
pub struct Client<S = TcpStream> {
    /// Framed transport
    connection: Connection<S>,

    /// Request id counter for this connection
    correlator: Correlator,

    /// Optional request/response dump
    recorder: Option<SessionRecorder>,
}

impl Client<TcpStream> {
    /// Connect to `config.server_addr`, recording if `config.dump_dir` is set
    pub fn connect(config: &Config) -> Result<Self> {
        let connection = Connection::connect(config)?;
        let recorder = match &config.dump_dir {
            Some(root) => Some(SessionRecorder::create(root)?),
            None => None,
        };

        tracing::info!("Connected to {}", connection.peer_addr());
        Ok(Self::new(connection, recorder))
    }

    /// Close the connection
    pub fn disconnect(self) -> Result<()> {
        self.connection.shutdown()
    }
}

impl<S: Read + Write> Client<S> {
    /// Create a client over an established connection
    pub fn new(connection: Connection<S>, recorder: Option<SessionRecorder>) -> Self {
        Self {
            connection,
            correlator: Correlator::new(),
            recorder,
        }
    }

    /// Id the next request will carry
    pub fn next_request_id(&self) -> u32 {
        self.correlator.peek()
    }

    pub fn connection(&self) -> &Connection<S> {
        &self.connection
    }

    pub fn into_connection(self) -> Connection<S> {
        self.connection
    }

    /// Send a command and return its (unwrapped) result
    ///
    /// Fails with `ProtocolMismatch` if the response answers a different
    /// request and with `CommandFailure` if the result carries `code != 1`.
    pub fn execute(&mut self, command: &Command) -> Result<Value> {
        let request_id = self.correlator.next_id();
        let request = Request::new(command, request_id);
        let payload = encode_request(&request)?;

        tracing::trace!("Sent: {}", String::from_utf8_lossy(&payload));
        if let Some(recorder) = &self.recorder {
            recorder.record_request(&request);
        }

        self.connection.send(&payload)?;
        let frame = self.connection.receive()?;

        let mut response = decode_response(&frame)?;
        response.unwrap_result()?;

        if let Some(recorder) = &self.recorder {
            recorder.record_response(&request.command, &response);
        }

        if !self.correlator.validate(&response, request_id) {
            tracing::warn!(
                "Wrong request_id in response ({} != {}) for {}",
                response.request_id,
                request_id,
                request.command
            );
            return Err(SlamError::ProtocolMismatch {
                expected: request_id,
                actual: response.request_id,
            });
        }

        if let Some(code) = response.failure_code() {
            tracing::warn!("Command {} failed with code {}", request.command, code);
            return Err(SlamError::CommandFailure {
                command: request.command,
                code,
            });
        }

        Ok(response.result)
    }

    fn execute_object(&mut self, command: &Command) -> Result<Map<String, Value>> {
        let name = command.name();
        match self.execute(command)? {
            Value::Object(map) => Ok(map),
            other => Err(SlamError::Decode(format!(
                "{} result is not an object: {}",
                name, other
            ))),
        }
    }

    fn execute_ack(&mut self, command: &Command) -> Result<CommandAck> {
        let result = self.execute(command)?;
        parse_result(command.name(), result)
    }

    // =========================================================================
    // Map Queries
    // =========================================================================

    /// Bounding box of the explored map
    pub fn get_known_area(&mut self) -> Result<KnownArea> {
        let result = self.execute(&Command::GetKnownArea(MapQuery::default()))?;
        parse_result("getknownarea", result)
    }

    /// Fetch the map covering the current known area
    ///
    /// Issues `getknownarea` first and derives the requested area from it.
    pub fn get_map_data(&mut self) -> Result<MapData> {
        let known_area = self.get_known_area()?;
        self.get_map_data_in(known_area.to_area())
    }

    /// Fetch and decode the map for an explicit area
    pub fn get_map_data_in(&mut self, area: Area) -> Result<MapData> {
        let command = Command::GetMapData {
            area,
            query: MapQuery::default(),
        };
        let raw: RawMapData = parse_result("getmapdata", self.execute(&command)?)?;

        let grid = payload::decode_grid(&raw.map_data, raw.dimension_x, raw.dimension_y)?;
        tracing::debug!(
            "Decoded {}x{} map at {} m/cell",
            raw.dimension_x,
            raw.dimension_y,
            raw.resolution
        );

        Ok(MapData {
            area,
            dimension_x: raw.dimension_x,
            dimension_y: raw.dimension_y,
            resolution: raw.resolution,
            grid,
            extra: raw.extra,
        })
    }

    // =========================================================================
    // Telemetry
    // =========================================================================

    pub fn get_pose(&mut self) -> Result<Pose> {
        let result = self.execute(&Command::GetPose)?;
        parse_result("getpose", result)
    }

    /// Fetch and decode the latest laser scan
    pub fn get_laser_scan(&mut self, valid_only: bool) -> Result<Vec<LaserSample>> {
        let raw: RawLaserScan = parse_result("getlaserscan", self.execute(&Command::GetLaserScan)?)?;
        let samples = payload::decode_laser(&raw.laser_points, valid_only)?;
        tracing::debug!("Decoded {} laser samples", samples.len());
        Ok(samples)
    }

    pub fn get_localization(&mut self) -> Result<Map<String, Value>> {
        self.execute_object(&Command::GetLocalization)
    }

    pub fn get_current_action(&mut self) -> Result<Map<String, Value>> {
        self.execute_object(&Command::GetCurrentAction)
    }

    pub fn get_robot_config(&mut self) -> Result<Map<String, Value>> {
        self.execute_object(&Command::GetRobotConfig)
    }

    pub fn get_binary_config(&mut self) -> Result<Map<String, Value>> {
        self.execute_object(&Command::GetBinaryConfig)
    }

    pub fn get_robot_features_info(&mut self) -> Result<Map<String, Value>> {
        self.execute_object(&Command::GetRobotFeaturesInfo)
    }

    pub fn get_sdp_version(&mut self) -> Result<Map<String, Value>> {
        self.execute_object(&Command::GetSdpVersion)
    }

    pub fn get_device_info(&mut self) -> Result<Map<String, Value>> {
        self.execute_object(&Command::GetDeviceInfo)
    }

    /// Issue every read command once
    pub fn get_all(&mut self) -> Result<()> {
        self.get_known_area()?;
        self.get_pose()?;
        self.get_map_data()?;
        self.get_laser_scan(false)?;
        self.get_localization()?;
        self.get_current_action()?;
        self.get_robot_config()?;
        self.get_binary_config()?;
        self.get_robot_features_info()?;
        self.get_sdp_version()?;
        self.get_device_info()?;
        Ok(())
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Turn localization on (`true`) or off
    pub fn set_localization(&mut self, value: bool) -> Result<CommandAck> {
        self.execute_ack(&Command::SetLocalization { value })
    }

    /// Turn live map updates on (`true`) or off
    pub fn set_update(&mut self, value: bool) -> Result<CommandAck> {
        self.execute_ack(&Command::SetUpdate { kind: 0, value })
    }

    pub fn clear_map(&mut self) -> Result<CommandAck> {
        self.execute_ack(&Command::ClearMap)
    }
}

/// Client handle that can be shared between threads
///
/// Each call holds the lock across its send/receive pair, so frames from
/// different callers never interleave on the wire.
pub struct SharedClient<S = TcpStream> {
    inner: Arc<Mutex<Client<S>>>,
}

impl<S> Clone for SharedClient<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Read + Write> SharedClient<S> {
    pub fn new(client: Client<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    /// Run operations with exclusive access to the client
    pub fn with<T>(&self, f: impl FnOnce(&mut Client<S>) -> Result<T>) -> Result<T> {
        let mut client = self.inner.lock();
        f(&mut client)
    }

    /// Send a single command
    pub fn execute(&self, command: &Command) -> Result<Value> {
        self.with(|client| client.execute(command))
    }
}
