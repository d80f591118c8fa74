// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn job_id_display_and_conversions() {
    let id: JobId = "abc".into();
    assert_eq!(id.as_str(), "abc");
    assert_eq!(id.to_string(), "abc");
    assert_eq!(JobId::from(String::from("abc")), id);
}

#[yare::parameterized(
    shorter   = { "abc", 8, "abc" },
    exact     = { "abcdefgh", 8, "abcdefgh" },
    truncated = { "abcdefghij", 4, "abcd" },
    multibyte = { "ééééé", 2, "éé" },
)]
fn job_id_short(input: &str, n: usize, expected: &str) {
    assert_eq!(JobId::new(input).short(n), expected);
}

#[test]
fn task_ids_order_by_submission() {
    assert!(TaskId(1) < TaskId(2));
    assert_eq!(TaskId(7).to_string(), "task-7");
}

#[test]
fn worker_id_display() {
    assert_eq!(WorkerId(3).to_string(), "worker-3");
}

#[test]
fn uuid_gen_produces_distinct_ids() {
    let gen = UuidIdGen;
    assert_ne!(gen.next(), gen.next());
}
