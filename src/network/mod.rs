//! Network Module
//!
//! TCP transport and the canned-response stub.
//!
//! ## Architecture
//! - `Connection`: one framed stream, blocking send/receive
//! - `StubServer`: single acceptor, one connection served at a time

mod server;
mod connection;

pub use server::{fixture_path, ShutdownHandle, StubServer};
pub use connection::Connection;
