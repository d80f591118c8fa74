//! Failure isolation specs: one bad file never sinks the others

use crate::prelude::*;

#[test]
fn corrupt_file_fails_alone() {
    let temp = Project::empty();
    temp.png("good.png", 16, 16);
    temp.file("bad.png", b"definitely not an image");

    let run = temp
        .sq()
        .args(&["compress", "-o", "json", "good.png", "bad.png", "--out-dir", "out"])
        .fails()
        .exit_code(1);
    let json = run.json();

    assert_eq!(json["completed"], 1);
    assert_eq!(json["failed"], 1);
    assert_eq!(json["files"][0]["status"], "done");
    assert_eq!(json["files"][1]["status"], "failed");
    assert!(json["files"][1]["error"].as_str().unwrap().contains("decode"));
    assert!(run.stderr().contains("1 of 2 files failed"));

    assert!(temp.exists("out/good.webp"));
    assert!(!temp.exists("out/bad.webp"));
}

#[test]
fn missing_and_empty_files_are_reported() {
    let temp = Project::empty();
    temp.png("good.png", 8, 8);
    temp.file("empty.png", b"");

    temp.sq()
        .args(&["compress", "good.png", "empty.png", "missing.png", "--out-dir", "out"])
        .fails()
        .stdout_has("1 compressed, 2 failed")
        .stdout_has("empty payload")
        .stdout_has("failed to read")
        .stderr_has("2 of 3 files failed");
}

#[test]
fn pixel_limit_rejects_large_images() {
    let temp = Project::empty();
    temp.png("big.png", 200, 200);
    temp.png("small.png", 10, 10);

    let json = temp
        .sq()
        .args(&["compress", "-o", "json", "big.png", "small.png", "--out-dir", "out"])
        .env("SQ_MAX_PIXELS", "1000")
        .fails()
        .json();

    assert_eq!(json["files"][0]["status"], "failed");
    assert_eq!(json["files"][1]["status"], "done");
}
