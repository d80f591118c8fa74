// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Image codec adapters

mod image_codec;

pub use image_codec::ImageCodec;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{fake_payload, CodecCall, FakeCodec, FakeImage};

use sq_core::EncodeOptions;
use thiserror::Error;

/// Errors reported by a codec.
///
/// All of these are data or format errors: the worker that hit one stays
/// usable for the next job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("image too large: {width}x{height} exceeds {max_pixels} pixels")]
    TooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },
    #[error("resize failed: {0}")]
    Resize(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Safety limits applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum `width * height` accepted
    pub max_pixels: u64,
}

impl DecodeLimits {
    pub fn check(&self, width: u32, height: u32) -> Result<(), CodecError> {
        if u64::from(width) * u64::from(height) > self.max_pixels {
            return Err(CodecError::TooLarge {
                width,
                height,
                max_pixels: self.max_pixels,
            });
        }
        Ok(())
    }
}

/// Adapter for decode, resize and per-format encode.
///
/// Calls are synchronous and CPU bound; the pool invokes them from
/// dedicated worker threads, never from the async runtime.
pub trait Codec: Clone + Send + Sync + 'static {
    /// In-memory image representation
    type Image: Send;

    /// Decode `bytes`, rejecting images beyond `limits`
    fn decode(&self, bytes: &[u8], limits: &DecodeLimits) -> Result<Self::Image, CodecError>;

    /// `(width, height)` in pixels
    fn dimensions(&self, image: &Self::Image) -> (u32, u32);

    /// Scale to exactly `width` x `height`
    fn resize(&self, image: Self::Image, width: u32, height: u32)
        -> Result<Self::Image, CodecError>;

    /// Encode according to `options`
    fn encode(&self, image: &Self::Image, options: &EncodeOptions) -> Result<Vec<u8>, CodecError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
