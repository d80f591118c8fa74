// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced codec wrapper for consistent observability

use crate::codec::{Codec, CodecError, DecodeLimits};
use sq_core::EncodeOptions;
use std::time::Instant;

/// Wrapper that adds tracing to any Codec
#[derive(Clone)]
pub struct TracedCodec<C> {
    inner: C,
}

impl<C> TracedCodec<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: Codec> Codec for TracedCodec<C> {
    type Image = C::Image;

    fn decode(&self, bytes: &[u8], limits: &DecodeLimits) -> Result<C::Image, CodecError> {
        tracing::info_span!("codec.decode", input_len = bytes.len()).in_scope(|| {
            let start = Instant::now();
            let result = self.inner.decode(bytes, limits);
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(image) => {
                    let (width, height) = self.inner.dimensions(image);
                    tracing::debug!(width, height, elapsed_ms, "decoded");
                }
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "decode failed"),
            }
            result
        })
    }

    fn dimensions(&self, image: &C::Image) -> (u32, u32) {
        self.inner.dimensions(image)
    }

    fn resize(&self, image: C::Image, width: u32, height: u32) -> Result<C::Image, CodecError> {
        tracing::info_span!("codec.resize", width, height).in_scope(|| {
            let start = Instant::now();
            let result = self.inner.resize(image, width, height);
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(_) => tracing::debug!(elapsed_ms, "resized"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "resize failed"),
            }
            result
        })
    }

    fn encode(&self, image: &C::Image, options: &EncodeOptions) -> Result<Vec<u8>, CodecError> {
        let format = options.format();
        tracing::info_span!("codec.encode", %format, quality = options.quality()).in_scope(|| {
            let start = Instant::now();
            let result = self.inner.encode(image, options);
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(bytes) => tracing::debug!(output_len = bytes.len(), elapsed_ms, "encoded"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "encode failed"),
            }
            result
        })
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
