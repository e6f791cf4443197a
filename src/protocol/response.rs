//! Response definitions
//!
//! The response envelope plus the typed result shapes of each command.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::command::Area;
use crate::error::{Result, SlamError};

/// `code` value that marks a successful command
pub const SUCCESS_CODE: i64 = 1;

/// A response envelope as received on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Id of the request this answers
    pub request_id: u32,

    /// Command result; some firmware sends it JSON-encoded inside a string
    pub result: Value,
}

impl Response {
    /// Create a response for the given request id
    pub fn new(request_id: u32, result: Value) -> Self {
        Self { request_id, result }
    }

    /// Replace a string-encoded result with the value it contains
    pub fn unwrap_result(&mut self) -> Result<()> {
        if let Value::String(encoded) = &self.result {
            let inner: Value = serde_json::from_str(encoded).map_err(|e| {
                SlamError::Decode(format!("string-encoded result is not JSON: {}", e))
            })?;
            self.result = inner;
        }
        Ok(())
    }

    /// The failure code, if the result carries a `code` other than success
    pub fn failure_code(&self) -> Option<i64> {
        let code = self.result.as_object()?.get("code")?;
        if code.as_f64() == Some(SUCCESS_CODE as f64) {
            return None;
        }
        Some(code.as_i64().unwrap_or(-1))
    }
}

// =============================================================================
// Typed Results
// =============================================================================

/// Bounding box of the explored map (`getknownarea`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnownArea {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl KnownArea {
    /// The area argument covering this bounding box
    pub fn to_area(&self) -> Area {
        Area {
            x: self.min_x,
            y: self.min_y,
            width: self.max_x - self.min_x,
            height: self.max_y - self.min_y,
        }
    }
}

/// Robot pose (`getpose`), yaw in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f64,
}

impl Pose {
    pub fn heading_degrees(&self) -> f64 {
        self.yaw.to_degrees()
    }
}

/// Undecoded `getmapdata` result
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMapData {
    /// Base64 RLE block
    pub map_data: String,
    pub dimension_x: usize,
    pub dimension_y: usize,
    /// Cell edge length in meters
    pub resolution: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Undecoded `getlaserscan` result
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawLaserScan {
    /// Base64 RLE block
    pub laser_points: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Acknowledgement returned by the set/clear commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandAck {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<u64>,
}

/// Deserialize a command result into its typed shape
pub fn parse_result<T: serde::de::DeserializeOwned>(command: &str, result: Value) -> Result<T> {
    serde_json::from_value(result)
        .map_err(|e| SlamError::Decode(format!("{} result: {}", command, e)))
}
