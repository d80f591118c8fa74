// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sq-core: Job descriptors, encode settings and transcode results for the
//! sq image compression pool

pub mod cache_key;
pub mod error;
pub mod format;
pub mod id;
pub mod job;
pub mod output;
pub mod settings;
pub mod tuning;

pub use cache_key::cache_key;
pub use error::ValidationError;
pub use format::OutputFormat;
pub use id::{IdGen, JobId, TaskId, UuidIdGen, WorkerId};
pub use job::JobDescriptor;
pub use output::{compression_ratio, TranscodeOutput};
pub use settings::{EncodeSettings, MAX_QUALITY, MIN_QUALITY};
pub use tuning::{
    AvifTuning, ChromaSubsampling, EncodeOptions, EncoderTuning, JpegTuning, PngCompression,
    PngTuning, TiffCompression, TiffTuning, WebpTuning,
};
