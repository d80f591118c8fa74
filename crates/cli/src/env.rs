// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.trim().is_empty())
}

// --- Logging ---

/// Log filter directives: SQ_LOG > RUST_LOG
pub fn log_filter() -> Option<String> {
    non_empty("SQ_LOG").or_else(|| non_empty("RUST_LOG"))
}

// --- Config file ---

pub fn config_path() -> Option<PathBuf> {
    non_empty("SQ_CONFIG").map(PathBuf::from)
}

// --- Pool overrides ---

pub fn pool_size() -> Option<String> {
    non_empty("SQ_POOL_SIZE")
}

pub fn max_queue() -> Option<String> {
    non_empty("SQ_MAX_QUEUE")
}

pub fn max_pixels() -> Option<String> {
    non_empty("SQ_MAX_PIXELS")
}

pub fn restart() -> Option<String> {
    non_empty("SQ_RESTART")
}

pub fn shutdown_grace_ms() -> Option<String> {
    non_empty("SQ_SHUTDOWN_GRACE_MS")
}

// --- Color ---

pub fn no_color() -> bool {
    std::env::var("NO_COLOR").is_ok_and(|v| v == "1")
}

pub fn force_color() -> bool {
    std::env::var("COLOR").is_ok_and(|v| v == "1")
}
