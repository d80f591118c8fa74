// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transcode results

use crate::format::OutputFormat;
use serde::Serialize;

/// Successful outcome of the full decode, resize, encode and metrics pipeline.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct TranscodeOutput {
    #[serde(skip)]
    pub output: Vec<u8>,
    pub cache_key: String,
    pub compressed_size: u64,
    /// Percentage saved relative to the original; negative when the output grew.
    pub compression_ratio: i64,
    pub output_format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for TranscodeOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscodeOutput")
            .field("cache_key", &self.cache_key)
            .field("compressed_size", &self.compressed_size)
            .field("compression_ratio", &self.compression_ratio)
            .field("output_format", &self.output_format)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// `round((original - compressed) / original * 100)`, with halves rounded
/// toward positive infinity. An empty original yields 0.
pub fn compression_ratio(original: u64, compressed: u64) -> i64 {
    if original == 0 {
        return 0;
    }
    let original = i128::from(original);
    let saved = original - i128::from(compressed);
    // floor(saved * 100 / original + 1/2) in exact integer arithmetic
    let ratio = (saved * 200 + original).div_euclid(original * 2);
    i64::try_from(ratio).unwrap_or(i64::MIN)
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
