// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sq image transcoding pool
//!
//! Architecture:
//! - Pool: cloneable facade; validates, lazily starts a dispatcher, hands out task handles
//! - Dispatcher: one tokio task owning the idle set and FIFO queue; matches jobs to workers
//! - Workers: dedicated OS threads running the decode, resize, encode pipeline

mod config;
mod dispatcher;
mod error;
mod lifecycle;
mod pipeline;
mod pool;
mod worker;

pub use config::{default_pool_size, PoolConfig, RestartPolicy};
pub use error::PoolError;
pub use lifecycle::{shutdown_signal, PoolState, PoolStatus};
pub use pipeline::{fit_within, Pipeline};
pub use pool::{Pool, TaskHandle};
pub use worker::WorkerState;
