// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pool facade

use crate::config::PoolConfig;
use crate::dispatcher::{Command, Dispatcher, PendingTask, TaskResult};
use crate::error::PoolError;
use crate::lifecycle::PoolStatus;
use crate::pipeline::Pipeline;
use sq_adapters::{Codec, DecodeLimits};
use sq_core::{
    EncodeSettings, IdGen, JobDescriptor, JobId, TaskId, TranscodeOutput, UuidIdGen,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot, watch, Mutex};

/// Resolves exactly once with the outcome of one submitted job.
///
/// Dropping the handle does not cancel the job.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    job: JobId,
    rx: oneshot::Receiver<TaskResult>,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn job_id(&self) -> &JobId {
        &self.job
    }
}

impl Future for TaskHandle {
    type Output = TaskResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // A dropped completion means the dispatcher went away with the task
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(PoolError::Terminated)))
    }
}

/// The live dispatcher of the current generation, if any
#[derive(Default)]
struct Generation {
    commands: Option<mpsc::UnboundedSender<Command>>,
    started: u64,
    next_task: u64,
}

struct Inner<C> {
    pipeline: Arc<Pipeline<C>>,
    config: PoolConfig,
    ids: UuidIdGen,
    generation: Mutex<Generation>,
    status: Arc<watch::Sender<PoolStatus>>,
}

/// Process-wide transcoding pool.
///
/// Cheap to clone; all clones share one set of workers. Workers start on
/// the first submission, and again on the first submission after the pool
/// terminated. Dropping the last clone shuts the pool down gracefully.
pub struct Pool<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for Pool<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Codec> Pool<C> {
    pub fn new(codec: C, config: PoolConfig) -> Self {
        let pipeline = Pipeline::new(
            codec,
            DecodeLimits {
                max_pixels: config.max_pixels,
            },
            config.tuning,
        );
        let (status, _) = watch::channel(PoolStatus::default());
        Self {
            inner: Arc::new(Inner {
                pipeline: Arc::new(pipeline),
                config,
                ids: UuidIdGen,
                generation: Mutex::new(Generation::default()),
                status: Arc::new(status),
            }),
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    /// Latest published status
    pub fn status(&self) -> PoolStatus {
        *self.inner.status.borrow()
    }

    /// Subscribe to status changes
    pub fn watch(&self) -> watch::Receiver<PoolStatus> {
        self.inner.status.subscribe()
    }

    /// Validate and run one job, waiting for its result.
    ///
    /// Invalid input is rejected before the pool is touched.
    pub async fn submit(
        &self,
        payload: impl Into<Arc<[u8]>>,
        settings: EncodeSettings,
        original_name: impl Into<String>,
        original_size: u64,
    ) -> Result<TranscodeOutput, PoolError> {
        let job = JobDescriptor::new(
            JobId::new(self.inner.ids.next()),
            payload,
            settings,
            original_name,
            original_size,
        )?;
        self.submit_job(job).await
    }

    /// Run an already validated job, waiting for its result
    pub async fn submit_job(&self, job: JobDescriptor) -> Result<TranscodeOutput, PoolError> {
        self.enqueue(job).await.await
    }

    /// Queue a job and return a handle to its result.
    ///
    /// Jobs enqueued one after another start in that order.
    pub async fn enqueue(&self, job: JobDescriptor) -> TaskHandle {
        let mut generation = self.inner.generation.lock().await;
        let id = TaskId(generation.next_task);
        generation.next_task += 1;

        let job_id = job.id().clone();
        let (task, rx) = PendingTask::new(id, job);
        let mut command = Command::Submit(task);

        if let Some(commands) = &generation.commands {
            match commands.send(command) {
                Ok(()) => return TaskHandle { id, job: job_id, rx },
                // Previous generation ended on its own
                Err(returned) => command = returned.0,
            }
        }

        generation.started += 1;
        let commands = self.start(generation.started);
        // Receiver is held by the dispatcher just spawned; if the send still
        // fails the dropped task resolves as terminated.
        let _ = commands.send(command);
        generation.commands = Some(commands);
        TaskHandle { id, job: job_id, rx }
    }

    fn start(&self, generation: u64) -> mpsc::UnboundedSender<Command> {
        let (commands, rx) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher::new(
            generation,
            Arc::clone(&self.inner.pipeline),
            &self.inner.config,
            rx,
            Arc::clone(&self.inner.status),
        );
        tokio::spawn(dispatcher.run());
        commands
    }

    /// Shut the pool down and wait until it has.
    ///
    /// Queued jobs fail with [`PoolError::Terminated`]; in-flight jobs get
    /// the configured grace period. Calling this on a pool that is not
    /// running does nothing.
    pub async fn terminate(&self) {
        let mut generation = self.inner.generation.lock().await;
        let Some(commands) = generation.commands.take() else {
            return;
        };
        let (done, finished) = oneshot::channel();
        if commands.send(Command::Terminate { done }).is_ok() {
            let _ = finished.await;
        }
    }

    /// Terminate once `signal` resolves, e.g. [`crate::shutdown_signal`]
    pub async fn terminate_on<F>(&self, signal: F)
    where
        F: Future,
    {
        signal.await;
        self.terminate().await;
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
