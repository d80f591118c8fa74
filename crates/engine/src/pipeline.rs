// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-job transcode pipeline run on worker threads

use sq_adapters::{Codec, CodecError, DecodeLimits};
use sq_core::{cache_key, compression_ratio, EncoderTuning, JobDescriptor, TranscodeOutput};

/// Target size for an image of `source` dimensions so that it fits within
/// the optional bounds.
///
/// The aspect ratio is preserved and images are never enlarged. Returns
/// `None` when no resize is needed: no bounds were given, or the source
/// already fits.
pub fn fit_within(
    source: (u32, u32),
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> Option<(u32, u32)> {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 {
        return None;
    }
    let bound_w = max_width.unwrap_or(u32::MAX).max(1);
    let bound_h = max_height.unwrap_or(u32::MAX).max(1);
    if src_w <= bound_w && src_h <= bound_h {
        return None;
    }

    let (src_w, src_h) = (u64::from(src_w), u64::from(src_h));
    let (bound_w, bound_h) = (u64::from(bound_w), u64::from(bound_h));
    // Width binds when bound_w / src_w <= bound_h / src_h
    let (w, h) = if bound_w * src_h <= bound_h * src_w {
        (bound_w, scale_rounded(src_h, bound_w, src_w))
    } else {
        (scale_rounded(src_w, bound_h, src_h), bound_h)
    };
    Some((clamp_dim(w, bound_w), clamp_dim(h, bound_h)))
}

/// `round(value * num / den)` in integer arithmetic
fn scale_rounded(value: u64, num: u64, den: u64) -> u64 {
    (value * num + den / 2) / den
}

fn clamp_dim(value: u64, bound: u64) -> u32 {
    u32::try_from(value.clamp(1, bound)).unwrap_or(u32::MAX)
}

/// Decode, optionally resize, encode, then compute the result metrics.
#[derive(Clone)]
pub struct Pipeline<C> {
    codec: C,
    limits: DecodeLimits,
    tuning: EncoderTuning,
}

impl<C: Codec> Pipeline<C> {
    pub fn new(codec: C, limits: DecodeLimits, tuning: EncoderTuning) -> Self {
        Self {
            codec,
            limits,
            tuning,
        }
    }

    pub fn run(&self, job: &JobDescriptor) -> Result<TranscodeOutput, CodecError> {
        let settings = job.settings();
        let mut image = self.codec.decode(job.payload(), &self.limits)?;

        let source = self.codec.dimensions(&image);
        if let Some((width, height)) =
            fit_within(source, settings.resize_width, settings.resize_height)
        {
            image = self.codec.resize(image, width, height)?;
        }
        let (width, height) = self.codec.dimensions(&image);

        let options = self.tuning.options_for(settings);
        let output = self.codec.encode(&image, &options)?;
        let compressed_size = output.len() as u64;

        Ok(TranscodeOutput {
            cache_key: cache_key(job.payload(), settings.output_format, settings.quality),
            compressed_size,
            compression_ratio: compression_ratio(job.original_size(), compressed_size),
            output_format: settings.output_format,
            width,
            height,
            output,
        })
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
