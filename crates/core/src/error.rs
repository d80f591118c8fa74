// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validation errors raised before a job ever reaches the pool

use thiserror::Error;

/// Synchronous rejection of a submission.
///
/// These never touch a worker: the job is refused at the facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported output format: '{0}' (expected jpeg, png, webp, avif or tiff)")]
    UnsupportedFormat(String),
    #[error("empty payload")]
    EmptyPayload,
    #[error("quality {0} out of range (expected 1-100)")]
    QualityOutOfRange(u8),
    #[error("resize {axis} must be greater than zero")]
    ZeroDimension { axis: &'static str },
}
