// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pool lifecycle states and process shutdown signals

use std::fmt;

/// Lifecycle of one pool generation.
///
/// `Terminated` is final for the generation; the next submission starts a
/// fresh one from `Initializing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoolState {
    #[default]
    Uninitialized,
    /// Workers spawned, waiting for every one to report ready
    Initializing,
    Running,
    /// Draining in-flight jobs; queued jobs have already been failed
    Terminating,
    Terminated,
}

impl PoolState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolState::Uninitialized => "uninitialized",
            PoolState::Initializing => "initializing",
            PoolState::Running => "running",
            PoolState::Terminating => "terminating",
            PoolState::Terminated => "terminated",
        }
    }

    /// True while the generation can accept work
    pub fn is_live(&self) -> bool {
        matches!(self, PoolState::Initializing | PoolState::Running)
    }
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time snapshot published by the dispatcher after every change.
///
/// The job counters accumulate across generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStatus {
    /// Number of the generation this snapshot describes; 0 before the first start
    pub generation: u64,
    pub state: PoolState,
    /// Live worker threads
    pub workers: usize,
    pub idle: usize,
    pub busy: usize,
    /// Jobs waiting for a worker
    pub queued: usize,
    pub completed: u64,
    pub failed: u64,
    /// Worker threads lost to panics
    pub crashed: u64,
}

/// Resolves on the first SIGINT or SIGTERM, yielding the signal name.
#[cfg(unix)]
pub async fn shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::select! {
        _ = sigterm.recv() => Ok("SIGTERM"),
        _ = sigint.recv() => Ok("SIGINT"),
    }
}

/// Resolves on the first Ctrl-C, yielding the signal name.
#[cfg(not(unix))]
pub async fn shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
