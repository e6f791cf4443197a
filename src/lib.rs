//! # slamlink
//!
//! Client for SDP-style robot mapping services:
//! - Delimiter-framed JSON commands over TCP
//! - Request id correlation with explicit failure results
//! - RLE occupancy grid decoding (with sentinel swapping)
//! - Packed laser scan decoding
//! - Canned-response stub server and session recording for offline work
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Command Client                            │
//! │        (getknownarea, getmapdata, getlaserscan, ...)         │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │                              │
//!                ▼                              ▼
//!   ┌────────────────────────┐      ┌────────────────────────┐
//!   │  Correlator + Codec    │      │   Payload Decoders     │
//!   │  (request ids, JSON)   │      │  RLE ─► Grid / Laser   │
//!   └───────────┬────────────┘      └────────────────────────┘
//!               │
//!               ▼
//!   ┌────────────────────────┐
//!   │  Connection (framing)  │
//!   │   TCP, \r\n\r\n scan   │
//!   └────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod payload;
pub mod network;
pub mod recorder;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SlamError, Result};
pub use config::Config;
pub use client::{Client, MapData, SharedClient};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of slamlink
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
