//! Integration tests for the `toontab` binary.
//!
//! Exercises the encode, decode, convert, and stats subcommands through the
//! real binary: stdin/stdout piping, file I/O, exit codes, the stderr count
//! advisory, and the conversion envelope shape.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};

/// Helper: path to the products.json fixture.
fn products_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/products.json")
}

/// Helper: path to the team.json fixture (ragged fields, nested values).
fn team_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/team.json")
}

/// Helper: read the products.json fixture as a string.
fn products_json() -> String {
    std::fs::read_to_string(products_json_path()).expect("products.json fixture must exist")
}

// ─────────────────────────────────────────────────────────────────────────────
// Encode subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn encode_stdin_to_stdout() {
    Command::cargo_bin("toontab")
        .unwrap()
        .arg("encode")
        .write_stdin(r#"[{"id":1,"name":"Alice"}]"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("data[1]{id,name}:"))
        .stdout(predicate::str::contains("1,Alice"));
}

#[test]
fn encode_file_to_stdout() {
    Command::cargo_bin("toontab")
        .unwrap()
        .args(["encode", "-i", products_json_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("data[3]{id,name,price,inStock}:"))
        .stdout(predicate::str::contains("1,Product A,29.99,true"))
        .stdout(predicate::str::contains("Product C\\, boxed"));
}

#[test]
fn encode_file_to_file() {
    let output_path = "/tmp/toontab-test-encode-output.toon";
    let _ = std::fs::remove_file(output_path);

    Command::cargo_bin("toontab")
        .unwrap()
        .args(["encode", "-i", products_json_path(), "-o", output_path])
        .assert()
        .success();

    let content = std::fs::read_to_string(output_path).expect("output file must exist");
    assert!(content.starts_with("data[3]{id,name,price,inStock}:"));
    assert!(!content.ends_with('\n'), "encoded output must not end in a newline");

    let _ = std::fs::remove_file(output_path);
}

#[test]
fn encode_unions_ragged_fields() {
    Command::cargo_bin("toontab")
        .unwrap()
        .args(["encode", "-i", team_json_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("data[2]{name,tags,lead,contact}:"))
        .stdout(predicate::str::contains("null"));
}

#[test]
fn encode_empty_array_produces_empty_output() {
    Command::cargo_bin("toontab")
        .unwrap()
        .arg("encode")
        .write_stdin("[]")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn encode_invalid_json_fails() {
    Command::cargo_bin("toontab")
        .unwrap()
        .arg("encode")
        .write_stdin("this is not json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("input is not valid JSON"));
}

#[test]
fn encode_non_array_fails() {
    Command::cargo_bin("toontab")
        .unwrap()
        .arg("encode")
        .write_stdin(r#"{"id":1}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected a JSON array"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Decode subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn decode_stdin_to_stdout() {
    let toon =
        "data[2]{id,name,price,inStock}:\n  1,Product A,29.99,true\n  2,Product B,49.99,false";

    Command::cargo_bin("toontab")
        .unwrap()
        .arg("decode")
        .write_stdin(toon)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"price\": 29.99"))
        .stdout(predicate::str::contains("\"inStock\": false"));
}

#[test]
fn decode_to_file() {
    let output_path = "/tmp/toontab-test-decode-output.json";
    let _ = std::fs::remove_file(output_path);

    Command::cargo_bin("toontab")
        .unwrap()
        .args(["decode", "-o", output_path])
        .write_stdin("data[1]{id,name}:\n  1,Alice")
        .assert()
        .success();

    let content = std::fs::read_to_string(output_path).expect("output file must exist");
    let value: Value = serde_json::from_str(&content).expect("output must be JSON");
    assert_eq!(value, json!([{"id": 1, "name": "Alice"}]));

    let _ = std::fs::remove_file(output_path);
}

#[test]
fn decode_count_mismatch_warns_on_stderr() {
    Command::cargo_bin("toontab")
        .unwrap()
        .arg("decode")
        .write_stdin("data[5]{a}:\n  1\n  2\n  3")
        .assert()
        .success()
        .stderr(predicate::str::contains("warning:"))
        .stderr(predicate::str::contains("declares 5"))
        .stdout(predicate::str::contains("\"a\": 3"));
}

#[test]
fn decode_malformed_header_fails() {
    Command::cargo_bin("toontab")
        .unwrap()
        .arg("decode")
        .write_stdin("data{a,b}:\n  1,2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed header"));
}

#[test]
fn decode_empty_input_fails() {
    Command::cargo_bin("toontab")
        .unwrap()
        .arg("decode")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one data line"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Convert subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn convert_json_to_toon_envelope() {
    let request = json!({"input": "[{\"id\":1}]", "mode": "json-to-toon"}).to_string();

    Command::cargo_bin("toontab")
        .unwrap()
        .arg("convert")
        .write_stdin(request)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\":true"))
        .stdout(predicate::str::contains("\"mode\":\"json-to-toon\""))
        .stdout(predicate::str::contains("data[1]{id}:"));
}

#[test]
fn convert_toon_to_json_envelope() {
    let request = json!({"input": "data[1]{id}:\n  1", "mode": "toon-to-json"}).to_string();

    Command::cargo_bin("toontab")
        .unwrap()
        .arg("convert")
        .write_stdin(request)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\":true"))
        .stdout(predicate::str::contains(r#"\"id\": 1"#));
}

#[test]
fn convert_failure_prints_envelope_and_exits_nonzero() {
    let request = json!({"input": "not json", "mode": "json-to-toon"}).to_string();

    Command::cargo_bin("toontab")
        .unwrap()
        .arg("convert")
        .write_stdin(request)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Invalid JSON or conversion failed"));
}

#[test]
fn convert_toon_failure_uses_the_toon_error_string() {
    let request = json!({"input": "data{a,b}:\n  1,2", "mode": "toon-to-json"}).to_string();

    Command::cargo_bin("toontab")
        .unwrap()
        .arg("convert")
        .write_stdin(request)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "Invalid TOON format or parsing failed",
        ));
}

#[test]
fn convert_malformed_request_body_fails() {
    Command::cargo_bin("toontab")
        .unwrap()
        .arg("convert")
        .write_stdin(r#"{"mode":"upside-down"}"#)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Invalid request body"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Stats subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn stats_reports_sizes_and_reduction() {
    Command::cargo_bin("toontab")
        .unwrap()
        .args(["stats", "-i", products_json_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("JSON size:"))
        .stdout(predicate::str::contains("TOON size:"))
        .stdout(predicate::str::contains("Reduction:"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Pipelines
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn encode_then_decode_returns_the_original_records() {
    let encoded = Command::cargo_bin("toontab")
        .unwrap()
        .args(["encode", "-i", products_json_path()])
        .output()
        .expect("encode must run");
    assert!(encoded.status.success());
    let toon = String::from_utf8(encoded.stdout).expect("TOON must be UTF-8");

    let decoded = Command::cargo_bin("toontab")
        .unwrap()
        .arg("decode")
        .write_stdin(toon)
        .output()
        .expect("decode must run");
    assert!(decoded.status.success());

    let back: Value = serde_json::from_slice(&decoded.stdout).expect("output must be JSON");
    let original: Value = serde_json::from_str(&products_json()).unwrap();
    assert_eq!(back, original);
}

#[test]
fn no_subcommand_shows_usage() {
    Command::cargo_bin("toontab")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
