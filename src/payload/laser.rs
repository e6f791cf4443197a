//! Laser scan records
//!
//! ## Record Layout (24 bytes)
//! ```text
//! ┌──────────────┬──────────────┬───────────┬───────────┬───────────────┐
//! │ Distance (4) │ Angle (4)    │ Rsvd (2)  │ Rsvd (2)  │ Reserved (12) │
//! │ f32 LE       │ f32 LE, rad  │ i16       │ i16       │ not decoded   │
//! └──────────────┴──────────────┴───────────┴───────────┴───────────────┘
//! ```

use serde::Serialize;

use crate::error::{Result, SlamError};

/// Full size of one record
pub const RECORD_SIZE: usize = 24;

/// Leading part of a record that carries distance and angle
pub const DECODED_SIZE: usize = 12;

/// Distance reported for a beam with no return
pub const NO_RETURN_DISTANCE: f32 = 100_000.0;

/// One range/bearing measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaserSample {
    pub angle_radian: f32,
    pub distance: f32,
    pub valid: bool,
}

impl LaserSample {
    pub fn angle_degrees(&self) -> f32 {
        self.angle_radian.to_degrees()
    }
}

/// Decode every record in a decompressed laser buffer
///
/// With `valid_only`, samples without a return are dropped.
pub fn decode_samples(bytes: &[u8], valid_only: bool) -> Result<Vec<LaserSample>> {
    let mut samples = Vec::with_capacity(bytes.len() / RECORD_SIZE + 1);
    let mut pos = 0;

    while pos < bytes.len() {
        let record = bytes.get(pos..pos + DECODED_SIZE).ok_or_else(|| {
            SlamError::Decode(format!(
                "truncated laser record at offset {}: {} bytes left",
                pos,
                bytes.len() - pos
            ))
        })?;
        pos += RECORD_SIZE;

        let distance = f32::from_le_bytes([record[0], record[1], record[2], record[3]]);
        let angle_radian = f32::from_le_bytes([record[4], record[5], record[6], record[7]]);

        let valid = distance != NO_RETURN_DISTANCE;
        if !valid && valid_only {
            continue;
        }

        samples.push(LaserSample {
            angle_radian,
            distance,
            valid,
        });
    }

    Ok(samples)
}
