//! JSON output specs

use crate::prelude::*;

#[test]
fn json_report_carries_result_metrics() {
    let temp = Project::empty();
    temp.png("photo.png", 100, 50);
    let original = std::fs::metadata(temp.path().join("photo.png")).unwrap().len();

    let run = temp
        .sq()
        .args(&[
            "compress", "-o", "json", "-f", "png", "--width", "50", "photo.png", "--out-dir",
            "out",
        ])
        .passes();
    let json = run.json();

    assert_eq!(json["completed"], 1);
    assert_eq!(json["failed"], 0);

    let file = &json["files"][0];
    assert_eq!(file["status"], "done");
    assert_eq!(file["output_format"], "png");
    assert_eq!(file["width"], 50);
    assert_eq!(file["height"], 25);
    assert_eq!(file["original_size"], original);
    assert!(file.get("error").is_none());

    let written = std::fs::metadata(temp.path().join("out/photo.png")).unwrap().len();
    assert_eq!(file["compressed_size"], written);

    // SHA-256 hex digest
    let key = file["cache_key"].as_str().unwrap();
    assert_eq!(key.len(), 64);
    assert!(key.chars().all(|c| c.is_ascii_hexdigit()));

    let ratio = file["compression_ratio"].as_i64().unwrap();
    let (original, written) = (original as i64, written as i64);
    let expected = ((original - written) * 200 + original).div_euclid(original * 2);
    assert_eq!(ratio, expected);
    assert_eq!(json["bytes_saved"], original - written);
}

#[test]
fn identical_inputs_share_a_cache_key() {
    let temp = Project::empty();
    temp.png("one.png", 24, 24);
    temp.png("two.png", 24, 24);

    let json = temp
        .sq()
        .args(&["compress", "-o", "json", "one.png", "two.png", "--out-dir", "out"])
        .passes()
        .json();

    assert_eq!(json["files"][0]["cache_key"], json["files"][1]["cache_key"]);
}
