// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pool configuration

use sq_core::EncoderTuning;
use std::time::Duration;

/// Upper bound on the default worker count
const MAX_DEFAULT_WORKERS: usize = 4;

/// What happens to a worker slot after its thread dies unexpectedly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestartPolicy {
    /// Drop the worker; the pool shrinks
    #[default]
    Never,
    /// Spawn a fresh worker in its place
    Replace,
}

impl std::str::FromStr for RestartPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" => Ok(RestartPolicy::Never),
            "replace" => Ok(RestartPolicy::Replace),
            other => Err(format!("unknown restart policy '{other}' (expected never or replace)")),
        }
    }
}

/// `min(available cores, 4)`, and at least one
pub fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .clamp(1, MAX_DEFAULT_WORKERS)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads, fixed for the lifetime of a pool generation
    pub pool_size: usize,
    /// Queue depth beyond which submissions fail with `Saturated`; `None` is unbounded
    pub max_queue: Option<usize>,
    /// Decode safety limit on `width * height`
    pub max_pixels: u64,
    pub restart: RestartPolicy,
    /// How long shutdown waits for in-flight jobs
    pub shutdown_grace: Duration,
    pub tuning: EncoderTuning,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            max_queue: Some(1024),
            max_pixels: 40_000_000,
            restart: RestartPolicy::Never,
            shutdown_grace: Duration::from_secs(5),
            tuning: EncoderTuning::default(),
        }
    }
}

impl PoolConfig {
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    pub fn with_max_queue(mut self, max_queue: Option<usize>) -> Self {
        self.max_queue = max_queue;
        self
    }

    pub fn with_restart(mut self, restart: RestartPolicy) -> Self {
        self.restart = restart;
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    pub fn with_tuning(mut self, tuning: EncoderTuning) -> Self {
        self.tuning = tuning;
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
