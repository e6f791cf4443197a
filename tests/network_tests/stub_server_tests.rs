//! Stub Server Tests
//!
//! These tests verify:
//! - Fixture lookup and request_id rewriting
//! - Silent drop on missing fixtures
//! - Full client round trips over TCP

use std::fs;
use std::path::Path;
use std::thread::{self, JoinHandle};

use serde_json::{json, Value};
use slamlink::network::{fixture_path, ShutdownHandle, StubServer};
use slamlink::payload::rle::encode_base64_block;
use slamlink::protocol::{encode_request, Command, Request};
use slamlink::{Client, Config, SlamError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_fixture(dir: &Path, command: &str, body: Value) {
    fs::write(fixture_path(dir, command), serde_json::to_string_pretty(&body).unwrap()).unwrap();
}

fn stub_config(dir: &Path) -> Config {
    Config::builder()
        .listen_addr("127.0.0.1:0")
        .fixture_dir(dir)
        .build()
}

fn start_stub(dir: &Path) -> (String, ShutdownHandle, JoinHandle<()>) {
    let server = StubServer::bind(stub_config(dir)).unwrap();
    let addr = server.local_addr().unwrap().to_string();
    let handle = server.shutdown_handle();
    let join = thread::spawn(move || server.run().unwrap());
    (addr, handle, join)
}

fn request_frame(command: &Command, request_id: u32) -> Vec<u8> {
    let mut frame = encode_request(&Request::new(command, request_id)).unwrap();
    frame.extend_from_slice(&[10, 13, 10, 13, 10]);
    frame
}

// =============================================================================
// Answer Tests
// =============================================================================

#[test]
fn test_answer_rewrites_request_id() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "getpose",
        json!({"request_id": 1, "result": {"x": 1.0, "y": 2.0, "z": 0.0, "yaw": 0.5}}),
    );
    let server = StubServer::bind(stub_config(dir.path())).unwrap();

    let reply = server.answer(&request_frame(&Command::GetPose, 77)).unwrap().unwrap();
    let value: Value = serde_json::from_slice(&reply).unwrap();

    assert_eq!(value["request_id"], 77);
    assert_eq!(value["result"]["yaw"], 0.5);
}

#[test]
fn test_answer_adds_missing_request_id() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), "clearmap", json!({"result": {"code": 1}}));
    let server = StubServer::bind(stub_config(dir.path())).unwrap();

    let reply = server.answer(&request_frame(&Command::ClearMap, 5)).unwrap().unwrap();
    let value: Value = serde_json::from_slice(&reply).unwrap();

    assert_eq!(value["request_id"], 5);
}

#[test]
fn test_answer_missing_fixture() {
    let dir = TempDir::new().unwrap();
    let server = StubServer::bind(stub_config(dir.path())).unwrap();

    assert!(server.answer(&request_frame(&Command::GetPose, 0)).unwrap().is_none());
}

#[test]
fn test_answer_malformed_request() {
    let dir = TempDir::new().unwrap();
    let server = StubServer::bind(stub_config(dir.path())).unwrap();

    assert!(matches!(
        server.answer(b"not json\n\r\n\r\n"),
        Err(SlamError::Decode(_))
    ));
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_client_against_stub() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "getknownarea",
        json!({"request_id": 0, "result": {"min_x": -2.9, "min_y": -2.6, "max_x": 7.65, "max_y": 1.15}}),
    );
    write_fixture(
        dir.path(),
        "getmapdata",
        json!({"request_id": 0, "result": {
            "map_data": encode_base64_block(&[0, 0, 0, 127, 255, 255], [0xFE, 0xFD]),
            "dimension_x": 3,
            "dimension_y": 2,
            "resolution": 0.05
        }}),
    );
    // Double-encoded result
    write_fixture(
        dir.path(),
        "getpose",
        json!({"request_id": 0, "result": "{\"x\":0.5,\"y\":-0.25,\"z\":0.0,\"yaw\":3.14}"}),
    );

    let (addr, shutdown, join) = start_stub(dir.path());
    let config = Config::builder().server_addr(addr).build();
    let mut client = Client::connect(&config).unwrap();

    let map = client.get_map_data().unwrap();
    assert_eq!(map.grid.row(1), Some(&[0u8, 0, 0][..]));
    assert_eq!(map.grid.row(2), Some(&[127u8, 255, 255][..]));

    let pose = client.get_pose().unwrap();
    assert_eq!(pose.x, 0.5);
    assert_eq!(pose.y, -0.25);

    assert_eq!(client.next_request_id(), 3);

    client.disconnect().unwrap();
    shutdown.shutdown();
    join.join().unwrap();
}

#[test]
fn test_missing_fixture_drops_connection() {
    let dir = TempDir::new().unwrap();
    let (addr, shutdown, join) = start_stub(dir.path());

    let config = Config::builder().server_addr(addr).build();
    let mut client = Client::connect(&config).unwrap();

    let err = client.get_device_info().unwrap_err();
    assert!(err.is_connection_lost(), "unexpected error: {}", err);

    drop(client);
    shutdown.shutdown();
    join.join().unwrap();
}
