// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic cache keys for transcode results

use crate::format::OutputFormat;
use sha2::{Digest, Sha256};

const KEY_VERSION: &[u8] = b"sq-cache-v1";

/// Fingerprint of `(payload, format, quality)`.
///
/// Each field is length-prefixed so distinct tuples never hash the same
/// byte stream. Resize bounds are deliberately not part of the key.
pub fn cache_key(payload: &[u8], format: OutputFormat, quality: u8) -> String {
    let mut hasher = Sha256::new();
    hasher.update(KEY_VERSION);
    hasher.update((payload.len() as u64).to_le_bytes());
    hasher.update(payload);
    let name = format.as_str().as_bytes();
    hasher.update((name.len() as u64).to_le_bytes());
    hasher.update(name);
    hasher.update([quality]);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
#[path = "cache_key_tests.rs"]
mod tests;
