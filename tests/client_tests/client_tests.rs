//! Tests for Client
//!
//! These tests verify:
//! - Request id stamping and mismatch reporting
//! - Double-encoded result unwrapping
//! - Command failure reporting
//! - Map area derivation and payload decoding
//! - Shared client serialization

#[path = "../common/mod.rs"]
mod common;

use std::thread;

use common::{response_frame, scripted_client, sent_requests, ScriptedStream};
use serde_json::{json, Value};
use slamlink::network::Connection;
use slamlink::payload::rle::encode_base64_block;
use slamlink::protocol::Command;
use slamlink::{Client, Config, SharedClient, SlamError};

// =============================================================================
// Helper Functions
// =============================================================================

fn laser_record(distance: f32, angle: f32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(24);
    bytes.extend_from_slice(&distance.to_le_bytes());
    bytes.extend_from_slice(&angle.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 16]);
    bytes
}

fn known_area_result() -> Value {
    json!({"min_x": -2.9, "min_y": -2.6, "max_x": 7.65, "max_y": 1.15})
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

// =============================================================================
// Correlation Tests
// =============================================================================

#[test]
fn test_request_ids_increase_per_call() {
    let mut client = scripted_client(vec![
        response_frame(0, json!({"x": 0.0, "y": 0.0, "z": 0.0, "yaw": 0.0})),
        response_frame(1, json!({"x": 1.0, "y": 0.0, "z": 0.0, "yaw": 0.0})),
    ]);

    client.get_pose().unwrap();
    client.get_pose().unwrap();

    let written = client.into_connection().into_inner().written;
    let requests = sent_requests(&written);
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0]["request_id"], 0);
    assert_eq!(requests[1]["request_id"], 1);
    assert_eq!(requests[0]["command"], "getpose");
}

#[test]
fn test_mismatch_reported_and_connection_reusable() {
    let mut client = scripted_client(vec![
        response_frame(5, json!({"x": 0.0, "y": 0.0, "z": 0.0, "yaw": 0.0})),
        response_frame(1, json!({"x": 2.0, "y": 3.0, "z": 0.0, "yaw": 1.0})),
    ]);

    match client.get_pose() {
        Err(SlamError::ProtocolMismatch { expected, actual }) => {
            assert_eq!(expected, 0);
            assert_eq!(actual, 5);
        }
        other => panic!("Expected ProtocolMismatch, got {:?}", other),
    }

    let pose = client.get_pose().unwrap();
    assert_eq!(pose.x, 2.0);
    assert_eq!(pose.y, 3.0);
}

// =============================================================================
// Result Handling Tests
// =============================================================================

#[test]
fn test_double_encoded_result() {
    let inner = r#"{"min_x":-1.5,"min_y":-1.0,"max_x":2.5,"max_y":3.0}"#;
    let mut client = scripted_client(vec![response_frame(0, Value::String(inner.to_string()))]);

    let area = client.get_known_area().unwrap();
    assert_eq!(area.min_x, -1.5);
    assert_eq!(area.max_y, 3.0);
}

#[test]
fn test_command_failure() {
    let mut client = scripted_client(vec![response_frame(0, json!({"code": 4, "timestamp": 1}))]);

    match client.set_update(false) {
        Err(SlamError::CommandFailure { command, code }) => {
            assert_eq!(command, "setupdate");
            assert_eq!(code, 4);
        }
        other => panic!("Expected CommandFailure, got {:?}", other),
    }
}

#[test]
fn test_command_failure_in_double_encoded_result() {
    let mut client = scripted_client(vec![response_frame(
        0,
        Value::String("{\"code\":0}".to_string()),
    )]);

    assert!(matches!(
        client.get_localization(),
        Err(SlamError::CommandFailure { code: 0, .. })
    ));
}

#[test]
fn test_set_localization_ack() {
    let mut client = scripted_client(vec![response_frame(
        0,
        json!({"code": 1, "timestamp": 4925591}),
    )]);

    let ack = client.set_localization(false).unwrap();
    assert_eq!(ack.code, Some(1));
    assert_eq!(ack.timestamp, Some(4925591));

    let written = client.into_connection().into_inner().written;
    let requests = sent_requests(&written);
    assert_eq!(requests[0]["args"], json!({"value": false}));
}

#[test]
fn test_clear_map_sends_zero_args() {
    let mut client = scripted_client(vec![response_frame(0, json!({"code": 1}))]);
    client.clear_map().unwrap();

    let written = client.into_connection().into_inner().written;
    assert_eq!(sent_requests(&written)[0]["args"], json!(0));
}

#[test]
fn test_pass_through_result() {
    let mut client = scripted_client(vec![response_frame(
        0,
        json!({"manufacturerName": "Slamtec", "modelName": "Mapper"}),
    )]);

    let info = client.get_device_info().unwrap();
    assert_eq!(info["modelName"], "Mapper");
}

#[test]
fn test_pass_through_rejects_non_object() {
    let mut client = scripted_client(vec![response_frame(0, json!([1, 2, 3]))]);

    assert!(matches!(client.get_sdp_version(), Err(SlamError::Decode(_))));
}

#[test]
fn test_typed_result_shape_error() {
    let mut client = scripted_client(vec![response_frame(0, json!({"x": "north"}))]);

    assert!(matches!(client.get_pose(), Err(SlamError::Decode(_))));
}

#[test]
fn test_connection_closed_mid_call() {
    let mut client = scripted_client(vec![b"{\"request_id\":0,".to_vec()]);

    assert!(matches!(client.get_pose(), Err(SlamError::ConnectionClosed)));
}

// =============================================================================
// Map and Laser Tests
// =============================================================================

#[test]
fn test_get_map_data_derives_area() {
    let cells = vec![0u8, 0, 50, 50, 100, 100];
    let mut client = scripted_client(vec![
        response_frame(0, known_area_result()),
        response_frame(
            1,
            json!({
                "map_data": encode_base64_block(&cells, [0xFE, 0xFD]),
                "dimension_x": 2,
                "dimension_y": 3,
                "resolution": 0.05,
                "timestamp": 99
            }),
        ),
    ]);

    let map = client.get_map_data().unwrap();
    assert_close(map.area.x, -2.9);
    assert_close(map.area.y, -2.6);
    assert_close(map.area.width, 10.55);
    assert_close(map.area.height, 3.75);
    assert_eq!(map.grid.row(2), Some(&[50u8, 50][..]));
    assert_eq!(map.extra["timestamp"], 99);

    let written = client.into_connection().into_inner().written;
    let requests = sent_requests(&written);
    assert_eq!(requests[0]["command"], "getknownarea");
    assert_eq!(requests[1]["command"], "getmapdata");

    let area = &requests[1]["args"]["area"];
    assert_close(area["x"].as_f64().unwrap(), -2.9);
    assert_close(area["y"].as_f64().unwrap(), -2.6);
    assert_close(area["width"].as_f64().unwrap(), 10.55);
    assert_close(area["height"].as_f64().unwrap(), 3.75);
    assert_eq!(requests[1]["args"]["kind"], 0);
    assert_eq!(requests[1]["args"]["partially"], false);
    assert_eq!(requests[1]["args"]["type"], 0);
}

#[test]
fn test_get_map_data_dimension_mismatch() {
    let mut client = scripted_client(vec![
        response_frame(0, known_area_result()),
        response_frame(
            1,
            json!({
                "map_data": encode_base64_block(&[1, 2, 3], [0xFE, 0xFD]),
                "dimension_x": 2,
                "dimension_y": 2,
                "resolution": 0.05
            }),
        ),
    ]);

    assert!(matches!(
        client.get_map_data(),
        Err(SlamError::DimensionMismatch { expected: 4, actual: 3 })
    ));
}

#[test]
fn test_get_map_data_stops_when_known_area_fails() {
    let mut client = scripted_client(vec![response_frame(0, json!({"code": 2}))]);

    assert!(matches!(
        client.get_map_data(),
        Err(SlamError::CommandFailure { code: 2, .. })
    ));

    let written = client.into_connection().into_inner().written;
    assert_eq!(sent_requests(&written).len(), 1);
}

#[test]
fn test_get_laser_scan() {
    let bytes = [
        laser_record(1.5, -1.0),
        laser_record(100000.0, 0.0),
        laser_record(2.5, 1.0),
    ]
    .concat();
    let frames = || {
        vec![response_frame(
            0,
            json!({"laser_points": encode_base64_block(&bytes, [0xFE, 0xFD])}),
        )]
    };

    let all = scripted_client(frames()).get_laser_scan(false).unwrap();
    assert_eq!(all.len(), 3);
    assert!(!all[1].valid);

    let valid = scripted_client(frames()).get_laser_scan(true).unwrap();
    assert_eq!(valid.len(), 2);
    assert_eq!(valid[1].angle_radian, 1.0);
}

#[test]
fn test_bad_rle_header_in_laser_scan() {
    let text = base64_of(b"XYZ\xFE\xFD\0\0\0\0");
    let mut client = scripted_client(vec![response_frame(0, json!({"laser_points": text}))]);

    assert!(matches!(client.get_laser_scan(false), Err(SlamError::Decode(_))));
}

fn base64_of(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

// =============================================================================
// Shared Client Tests
// =============================================================================

#[test]
fn test_shared_client_serializes_calls() {
    let frames: Vec<Vec<u8>> = (0..8)
        .map(|id| response_frame(id, json!({"code": 1})))
        .collect();
    let stream = ScriptedStream::new(frames);
    let client = Client::new(Connection::from_stream(stream, &Config::default()), None);
    let shared = SharedClient::new(client);

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..2 {
                    shared.execute(&Command::ClearMap).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(shared.with(|client| Ok(client.next_request_id())).unwrap(), 8);
}
