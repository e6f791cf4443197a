//! Command definitions
//!
//! Every command the client can issue, with its typed arguments.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Command names as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    GetKnownArea,
    GetPose,
    GetMapData,
    GetLaserScan,
    GetLocalization,
    GetCurrentAction,
    GetRobotConfig,
    GetBinaryConfig,
    GetRobotFeaturesInfo,
    GetSdpVersion,
    GetDeviceInfo,
    SetLocalization,
    SetUpdate,
    ClearMap,
}

impl CommandType {
    /// Every command in catalog order
    pub const ALL: [CommandType; 14] = [
        CommandType::GetKnownArea,
        CommandType::GetPose,
        CommandType::GetMapData,
        CommandType::GetLaserScan,
        CommandType::GetLocalization,
        CommandType::GetCurrentAction,
        CommandType::GetRobotConfig,
        CommandType::GetBinaryConfig,
        CommandType::GetRobotFeaturesInfo,
        CommandType::GetSdpVersion,
        CommandType::GetDeviceInfo,
        CommandType::SetLocalization,
        CommandType::SetUpdate,
        CommandType::ClearMap,
    ];

    /// Wire name of the command
    pub fn as_str(self) -> &'static str {
        match self {
            CommandType::GetKnownArea => "getknownarea",
            CommandType::GetPose => "getpose",
            CommandType::GetMapData => "getmapdata",
            CommandType::GetLaserScan => "getlaserscan",
            CommandType::GetLocalization => "getlocalization",
            CommandType::GetCurrentAction => "getcurrentaction",
            CommandType::GetRobotConfig => "getrobotconfig",
            CommandType::GetBinaryConfig => "getbinaryconfig",
            CommandType::GetRobotFeaturesInfo => "getrobotfeaturesinfo",
            CommandType::GetSdpVersion => "getsdpversion",
            CommandType::GetDeviceInfo => "getdeviceinfo",
            CommandType::SetLocalization => "setlocalization",
            CommandType::SetUpdate => "setupdate",
            CommandType::ClearMap => "clearmap",
        }
    }

    /// Look up a command by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

/// Map selector shared by the area and map queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MapQuery {
    pub kind: u32,
    pub partially: bool,
    #[serde(rename = "type")]
    pub map_type: u32,
}

/// Rectangle in map coordinates (meters)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Area {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A command with its arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Bounding box of the explored map
    GetKnownArea(MapQuery),

    /// Current robot pose
    GetPose,

    /// Compressed occupancy grid for an area
    GetMapData { area: Area, query: MapQuery },

    /// Compressed laser scan buffer
    GetLaserScan,

    GetLocalization,
    GetCurrentAction,
    GetRobotConfig,
    GetBinaryConfig,
    GetRobotFeaturesInfo,
    GetSdpVersion,
    GetDeviceInfo,

    /// Turn localization on or off
    SetLocalization { value: bool },

    /// Turn live map updates on or off
    SetUpdate { kind: u32, value: bool },

    /// Drop the stored map
    ClearMap,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::GetKnownArea(_) => CommandType::GetKnownArea,
            Command::GetPose => CommandType::GetPose,
            Command::GetMapData { .. } => CommandType::GetMapData,
            Command::GetLaserScan => CommandType::GetLaserScan,
            Command::GetLocalization => CommandType::GetLocalization,
            Command::GetCurrentAction => CommandType::GetCurrentAction,
            Command::GetRobotConfig => CommandType::GetRobotConfig,
            Command::GetBinaryConfig => CommandType::GetBinaryConfig,
            Command::GetRobotFeaturesInfo => CommandType::GetRobotFeaturesInfo,
            Command::GetSdpVersion => CommandType::GetSdpVersion,
            Command::GetDeviceInfo => CommandType::GetDeviceInfo,
            Command::SetLocalization { .. } => CommandType::SetLocalization,
            Command::SetUpdate { .. } => CommandType::SetUpdate,
            Command::ClearMap => CommandType::ClearMap,
        }
    }

    /// Wire name of the command
    pub fn name(&self) -> &'static str {
        self.command_type().as_str()
    }

    /// JSON value sent in the `args` field
    pub fn args(&self) -> Value {
        match self {
            Command::GetKnownArea(query) => json!({
                "kind": query.kind,
                "partially": query.partially,
                "type": query.map_type,
            }),
            Command::GetMapData { area, query } => json!({
                "area": {
                    "x": area.x,
                    "y": area.y,
                    "width": area.width,
                    "height": area.height,
                },
                "kind": query.kind,
                "partially": query.partially,
                "type": query.map_type,
            }),
            Command::SetLocalization { value } => json!({ "value": value }),
            Command::SetUpdate { kind, value } => json!({ "kind": kind, "value": value }),
            // The device expects a literal 0 here
            Command::ClearMap => json!(0),
            _ => Value::Null,
        }
    }
}

/// A request as sent on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub command: String,
    #[serde(default)]
    pub args: Value,
    pub request_id: u32,
}

impl Request {
    /// Build the wire request for a command
    pub fn new(command: &Command, request_id: u32) -> Self {
        Self {
            command: command.name().to_string(),
            args: command.args(),
            request_id,
        }
    }
}
