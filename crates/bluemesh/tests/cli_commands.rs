#![cfg(feature = "cli")]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use bluemesh::wire::{Address, Frame, FrameReader, HubMessage, ScanResult, ScannedDevice};

// opcode 0x01, handle 0x0002, 18 data bytes: source aa:bb:cc:dd:ee:ff, type 101,
// one scanned device 11:22:33:44:55:66 at -60 dBm seen 3 times.
const SCAN_HUB_HEX: &str = "01020012ffeeddccbbaa650001665544332211c40300";

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "bluemesh-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn bluemesh(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bluemesh"))
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("bluemesh should run")
}

fn json_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line should be json"))
        .collect()
}

#[test]
fn decode_scan_result_hub_message_as_json() {
    let output = bluemesh(&["decode", "hub", SCAN_HUB_HEX, "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 1);
    let hub = &lines[0];
    assert_eq!(hub["kind"], "hub");
    assert_eq!(hub["opcode"], 1);
    assert_eq!(hub["handle"], 2);
    assert_eq!(hub["source"], "aa:bb:cc:dd:ee:ff");
    assert_eq!(hub["message_type"], 101);
    assert_eq!(hub["devices"][0]["address"], "11:22:33:44:55:66");
    assert_eq!(hub["devices"][0]["rssi"], -60);
    assert_eq!(hub["devices"][0]["occurrences"], 3);
}

#[test]
fn short_envelope_exits_with_data_invalid() {
    let output = bluemesh(&["decode", "frame", "0102", "--format", "json"]);
    assert_eq!(output.status.code(), Some(60));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("decode failed"));
}

#[test]
fn strict_decode_rejects_length_mismatch() {
    // Declares 5 data bytes but carries 2.
    let lenient = bluemesh(&["decode", "frame", "01000005aabb", "--format", "json"]);
    assert!(lenient.status.success());
    assert_eq!(json_lines(&lenient)[0]["length_consistent"], false);

    let strict = bluemesh(&["decode", "frame", "01000005aabb", "--strict"]);
    assert_eq!(strict.status.code(), Some(60));
}

#[test]
fn malformed_address_is_usage_error() {
    let output = bluemesh(&["encode", "tracked", "--address", "not-an-address", "--rssi", "-40"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn reconstruct_known_timestamp() {
    let output = bluemesh(&[
        "reconstruct",
        "--partial",
        "34186",
        "--reference",
        "1516206008",
        "--utc-offset",
        "0",
        "--format",
        "raw",
    ]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1516209546\n");
}

#[test]
fn reconstruct_defaults_reference_to_now() {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time should be after epoch")
        .as_secs() as i64;
    let partial = (now & 0xFFFF).to_string();

    let output = bluemesh(&[
        "reconstruct",
        "--partial",
        &partial,
        "--utc-offset",
        "0",
        "--format",
        "json",
    ]);
    assert!(output.status.success());
    let view = &json_lines(&output)[0];
    let reference = view["reference"].as_i64().expect("reference field");
    assert!((reference - now).abs() <= 5, "reference {reference} vs now {now}");
    assert_eq!(view["reconstructed"].as_i64(), Some(now));
}

#[test]
fn reconstruct_reports_offset_time_base() {
    let output = bluemesh(&[
        "reconstruct",
        "--partial",
        "0x8a8a",
        "--reference",
        "1516206008",
        "--utc-offset",
        "3600",
        "--format",
        "json",
    ]);
    assert!(output.status.success());
    let view = &json_lines(&output)[0];
    assert_eq!(view["kind"], "timestamp");
    assert_eq!(view["utc_offset_secs"], 3600);
    assert_eq!(view["reconstructed"].as_i64().map(|t| t & 0xFFFF), Some(0x8a8a));
}

#[test]
fn encode_tracked_matches_wire_layout() {
    let output = bluemesh(&[
        "encode",
        "tracked",
        "--address",
        "01:02:03:04:05:06",
        "--rssi",
        "-70",
        "--format",
        "json",
    ]);
    assert!(output.status.success());
    let view = &json_lines(&output)[0];
    assert_eq!(view["record"], "tracked");
    assert_eq!(view["hex"], "060504030201ba");
}

#[test]
fn encode_config_then_decode_reports_value() {
    let encoded = bluemesh(&["encode", "config", "--type", "0x04", "--payload", "10270000", "--format", "json"]);
    assert!(encoded.status.success());
    let hex = json_lines(&encoded)[0]["hex"]
        .as_str()
        .expect("hex field")
        .to_string();
    assert_eq!(hex, "0400040010270000");

    let decoded = bluemesh(&["decode", "config", &hex, "--format", "json"]);
    assert!(decoded.status.success());
    let view = &json_lines(&decoded)[0];
    assert_eq!(view["config_type"], 4);
    assert_eq!(view["value"], 10000);
}

#[test]
fn appended_frames_dump_in_order() {
    let dir = unique_temp_dir("dump");
    let capture = dir.join("capture.bin");
    let capture_arg = capture.to_str().expect("utf-8 temp path");

    let first = bluemesh(&[
        "encode", "frame", "--opcode", "1", "--handle", "0x10", "--data", "aabb", "--append",
        capture_arg, "--format", "json",
    ]);
    assert!(first.status.success());
    let second = bluemesh(&[
        "encode", "hub", "--opcode", "2", "--source", "aa:bb:cc:dd:ee:ff", "--type", "7",
        "--payload", "0102", "--append", capture_arg, "--format", "json",
    ]);
    assert!(second.status.success());

    let dump = bluemesh(&["dump", capture_arg, "--format", "json"]);
    assert!(dump.status.success(), "stderr: {}", String::from_utf8_lossy(&dump.stderr));
    let frames = json_lines(&dump);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["opcode"], 1);
    assert_eq!(frames[0]["handle"], 16);
    assert_eq!(frames[0]["data"], "aabb");
    assert_eq!(frames[1]["opcode"], 2);
    assert_eq!(frames[1]["data_length"], 10);

    let limited = bluemesh(&["dump", capture_arg, "--count", "1", "--format", "json"]);
    assert_eq!(json_lines(&limited).len(), 1);

    let file = std::fs::File::open(&capture).expect("capture should exist");
    let frames: Vec<Frame> = FrameReader::new(file)
        .collect::<Result<_, _>>()
        .expect("capture should decode");
    let hub = HubMessage::from_frame(&frames[1]).expect("second frame is a hub message");
    assert_eq!(hub.source, "aa:bb:cc:dd:ee:ff".parse::<Address>().expect("address"));
    assert_eq!(hub.message_type, 7);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn dump_hub_capture_from_stdin() {
    let result = ScanResult {
        devices: vec![ScannedDevice {
            address: Address([0x11, 0x22, 0x33, 0x44, 0x55, 0x66]),
            rssi: -60,
            occurrences: 3,
        }],
    };
    let message = HubMessage::scan_result(1, 2, Address([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]), &result)
        .expect("scan result fits in a frame");
    let wire = message.encode().expect("hub message encodes");
    assert_eq!(hex::encode(&wire), SCAN_HUB_HEX);

    let mut child = Command::new(env!("CARGO_BIN_EXE_bluemesh"))
        .args(["--log-level", "error", "dump", "-", "--hub", "--format", "json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("dump should start");
    {
        let mut stdin = child.stdin.take().expect("stdin piped");
        stdin.write_all(&wire).expect("write first frame");
        stdin.write_all(&wire).expect("write second frame");
    }
    let output = child.wait_with_output().expect("dump should finish");
    assert!(output.status.success());

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 2);
    for line in &lines {
        assert_eq!(line["kind"], "hub");
        assert_eq!(line["devices"][0]["occurrences"], 3);
    }
}

#[test]
fn truncated_capture_fails_after_complete_frames() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_bluemesh"))
        .args(["--log-level", "error", "dump", "-", "--format", "json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("dump should start");
    {
        let mut stdin = child.stdin.take().expect("stdin piped");
        stdin.write_all(&[0x01, 0x00, 0x00, 0x01, 0xAA]).expect("write frame");
        stdin.write_all(&[0x01, 0x00, 0x00, 0x04, 0xBB]).expect("write partial frame");
    }
    let output = child.wait_with_output().expect("dump should finish");

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json_lines(&output).len(), 1);
}
