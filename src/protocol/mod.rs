//! Protocol Module
//!
//! Defines the wire protocol for client/robot communication.
//!
//! ## Protocol Format (JSON, delimiter-framed)
//!
//! ### Request Format
//! ```text
//! {"command": <string>, "args": <value|null>, "request_id": <u32>} 0A 0D 0A 0D 0A
//! ```
//!
//! ### Response Format
//! ```text
//! {"request_id": <u32>, "result": <object|string-encoded object>} 0D 0A 0D 0A
//! ```
//!
//! ### Result Codes
//! - absent: success
//! - 1:      success
//! - other:  command failure

mod command;
mod response;
mod codec;
mod correlator;

pub use command::{Area, Command, CommandType, MapQuery, Request};
pub use response::{
    parse_result, CommandAck, KnownArea, Pose, RawLaserScan, RawMapData, Response, SUCCESS_CODE,
};
pub use codec::{
    decode_request, decode_response, encode_request, encode_response, map_io_error,
    strip_terminator, write_frame, FrameReader, FRAME_TERMINATOR, REQUEST_TERMINATOR,
    RESPONSE_TERMINATOR,
};
pub use correlator::Correlator;
