// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the transcoding pool

use sq_adapters::CodecError;
use sq_core::{ValidationError, WorkerId};
use thiserror::Error;

/// Every way a submission can end without a result.
///
/// Validation errors are returned before the pool is touched; everything
/// else reaches the caller through its task handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("invalid job: {0}")]
    Validation(#[from] ValidationError),
    #[error("transcode failed: {0}")]
    Transcode(#[from] CodecError),
    #[error("{worker} crashed: {message}")]
    WorkerCrashed { worker: WorkerId, message: String },
    #[error("pool saturated: {capacity} jobs already queued")]
    Saturated { capacity: usize },
    #[error("no workers available: {0}")]
    NoWorkers(String),
    #[error("pool terminated")]
    Terminated,
}

impl PoolError {
    /// True for errors that depend only on the input, so resubmitting the
    /// same job cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, PoolError::Validation(_) | PoolError::Transcode(_))
    }
}
