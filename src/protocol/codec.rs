//! Protocol codec
//!
//! Encoding, decoding and framing for the wire protocol.
//!
//! ## Wire Format
//!
//! Messages are UTF-8 JSON objects followed by a terminator. There is no
//! length prefix; a frame is only complete once its trailing bytes arrive.
//!
//! ### Request Frame
//! ```text
//! ┌──────────────────────────────────────────────┬────────────────────┐
//! │ {"command": .., "args": .., "request_id": ..}│ 0A 0D 0A 0D 0A     │
//! └──────────────────────────────────────────────┴────────────────────┘
//! ```
//!
//! ### Response Frame
//! ```text
//! ┌──────────────────────────────────────────────┬────────────────────┐
//! │ {"request_id": .., "result": ..}             │ 0D 0A 0D 0A        │
//! └──────────────────────────────────────────────┴────────────────────┘
//! ```
//!
//! The receiver scans for the four-byte sequence on either side. The
//! five-byte request terminator ends in those same four bytes.

use std::io::{ErrorKind, Read, Write};

use bytes::{Bytes, BytesMut};

use super::{Request, Response};
use crate::error::{Result, SlamError};

/// Appended after every request payload
pub const REQUEST_TERMINATOR: &[u8] = &[0x0A, 0x0D, 0x0A, 0x0D, 0x0A];

/// Appended after every response payload
pub const RESPONSE_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Sequence the receiver scans for at the end of the accumulated bytes
pub const FRAME_TERMINATOR: &[u8; 4] = b"\r\n\r\n";

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request to its JSON payload (terminator not included)
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(request)?)
}

/// Decode a request from a received frame
pub fn decode_request(frame: &[u8]) -> Result<Request> {
    serde_json::from_slice(strip_terminator(frame))
        .map_err(|e| SlamError::Decode(format!("malformed request frame: {}", e)))
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to its JSON payload (terminator not included)
pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(response)?)
}

/// Decode a response from a received frame
///
/// The result is returned as sent; string-encoded results are unwrapped by
/// [`Response::unwrap_result`].
pub fn decode_response(frame: &[u8]) -> Result<Response> {
    serde_json::from_slice(strip_terminator(frame))
        .map_err(|e| SlamError::Decode(format!("malformed response frame: {}", e)))
}

/// Drop trailing terminator bytes (any mix of CR and LF)
pub fn strip_terminator(frame: &[u8]) -> &[u8] {
    let end = frame
        .iter()
        .rposition(|b| *b != b'\r' && *b != b'\n')
        .map_or(0, |i| i + 1);
    &frame[..end]
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Accumulates socket reads until a full frame has arrived
#[derive(Debug)]
pub struct FrameReader {
    /// Bytes of the frame being assembled
    buffer: BytesMut,

    /// Scratch buffer for a single read
    chunk: Vec<u8>,

    /// Abort once the frame grows past this
    max_frame_size: usize,
}

impl FrameReader {
    /// Create a reader issuing reads of `chunk_size` bytes
    pub fn new(chunk_size: usize, max_frame_size: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(chunk_size),
            chunk: vec![0u8; chunk_size.max(1)],
            max_frame_size,
        }
    }

    /// Read one complete frame, terminator included
    ///
    /// Blocks until the accumulated bytes end with [`FRAME_TERMINATOR`].
    pub fn read_frame<R: Read>(&mut self, reader: &mut R) -> Result<Bytes> {
        self.buffer.clear();

        loop {
            let n = match reader.read(&mut self.chunk) {
                Ok(0) => return Err(SlamError::ConnectionClosed),
                Ok(n) => n,
                Err(e) => return Err(map_io_error(e)),
            };
            self.buffer.extend_from_slice(&self.chunk[..n]);

            if self.buffer.ends_with(FRAME_TERMINATOR) {
                return Ok(self.buffer.split().freeze());
            }

            if self.buffer.len() > self.max_frame_size {
                return Err(SlamError::Protocol(format!(
                    "Frame too large: {} bytes without terminator (max {})",
                    self.buffer.len(),
                    self.max_frame_size
                )));
            }
        }
    }
}

/// Write a payload followed by a terminator
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8], terminator: &[u8]) -> Result<()> {
    let mut message = Vec::with_capacity(payload.len() + terminator.len());
    message.extend_from_slice(payload);
    message.extend_from_slice(terminator);

    writer.write_all(&message).map_err(map_io_error)?;
    writer.flush().map_err(map_io_error)?;
    Ok(())
}

/// Translate socket errors into the transport error kinds
pub fn map_io_error(err: std::io::Error) -> SlamError {
    match err.kind() {
        ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted => SlamError::ConnectionReset,
        ErrorKind::UnexpectedEof | ErrorKind::BrokenPipe => SlamError::ConnectionClosed,
        // Windows reports TimedOut where unix reports WouldBlock
        ErrorKind::WouldBlock | ErrorKind::TimedOut => SlamError::Timeout,
        _ => SlamError::Io(err),
    }
}
