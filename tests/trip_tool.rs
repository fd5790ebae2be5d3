//! Binary-level tests for the trip planner.
//!
//! Covers the pipeline from a map file and a stop list to printed
//! directions, stdin and output-file modes, the JSON legs view, and the
//! error paths surfaced on stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Three towns in a straight line joined by one road.
const LINE_MAP: &str = "L A 0 0\n\
                        L B 0 10\n\
                        L C 0 30\n\
                        R A main 10 SN B\n\
                        R B main 20 SN C\n";

/// Get a command for the trip planner.
fn trip_cmd() -> Command {
    Command::cargo_bin("pathgraph-trip").unwrap()
}

fn write_map(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("Map");
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_directions_for_request_argument() {
    let dir = tempdir().unwrap();
    let map = write_map(dir.path(), LINE_MAP);

    trip_cmd()
        .arg("-m")
        .arg(&map)
        .arg("A,C")
        .assert()
        .success()
        .stdout("From A:\n\n1. Take main north for 30.0 miles to C.\n");
}

#[test]
fn test_request_read_from_stdin() {
    let dir = tempdir().unwrap();
    let map = write_map(dir.path(), LINE_MAP);

    trip_cmd()
        .arg("--map")
        .arg(&map)
        .write_stdin("A,C\n")
        .assert()
        .success()
        .stdout("From A:\n\n1. Take main north for 30.0 miles to C.\n");
}

#[test]
fn test_round_trip_keeps_numbering() {
    let dir = tempdir().unwrap();
    let map = write_map(dir.path(), LINE_MAP);

    trip_cmd()
        .arg("-m")
        .arg(&map)
        .arg("A,C,A")
        .assert()
        .success()
        .stdout(
            "From A:\n\n\
             1. Take main north for 30.0 miles to C.\n\
             2. Take main south for 30.0 miles to A.\n",
        );
}

#[test]
fn test_directions_written_to_output_file() {
    let dir = tempdir().unwrap();
    let map = write_map(dir.path(), LINE_MAP);
    let out = dir.path().join("directions.txt");

    trip_cmd()
        .arg("-m")
        .arg(&map)
        .arg("-o")
        .arg(&out)
        .arg("A,C")
        .assert()
        .success()
        .stdout("");

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written, "From A:\n\n1. Take main north for 30.0 miles to C.\n");
}

#[test]
fn test_json_legs_view() {
    let dir = tempdir().unwrap();
    let map = write_map(dir.path(), LINE_MAP);

    let assert = trip_cmd()
        .arg("-m")
        .arg(&map)
        .arg("--json")
        .arg("A,C")
        .assert()
        .success();

    let legs: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(
        legs,
        serde_json::json!([{
            "road": "main",
            "direction": "north",
            "length": 30.0,
            "destination": "C"
        }])
    );
}

#[test]
fn test_unconnected_stop_reports_no_route() {
    let dir = tempdir().unwrap();
    let map = write_map(
        dir.path(),
        "L A 0 0\nL B 0 10\nL X 50 50\nR A main 10 SN B\n",
    );

    trip_cmd()
        .arg("-m")
        .arg(&map)
        .arg("A,X")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Error: impossible to travel from A to X",
        ));
}

#[test]
fn test_undefined_stop_is_reported() {
    let dir = tempdir().unwrap();
    let map = write_map(dir.path(), LINE_MAP);

    trip_cmd()
        .arg("-m")
        .arg(&map)
        .arg("A,Zed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Unknown location: Zed"));
}

#[test]
fn test_single_stop_request_is_rejected() {
    let dir = tempdir().unwrap();
    let map = write_map(dir.path(), LINE_MAP);

    trip_cmd()
        .arg("-m")
        .arg(&map)
        .arg("A")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error: A trip request needs at least two stops",
        ));
}

#[test]
fn test_map_syntax_error_names_the_line() {
    let dir = tempdir().unwrap();
    let map = write_map(dir.path(), "L A 0 0\nR broken\n");

    trip_cmd()
        .arg("-m")
        .arg(&map)
        .arg("A,A")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Syntax error in line: R broken"));
}

#[test]
fn test_missing_map_reports_io_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("no-map");

    trip_cmd()
        .arg("-m")
        .arg(&missing)
        .arg("A,B")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: IO error"));
}
