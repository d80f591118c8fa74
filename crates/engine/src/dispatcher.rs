// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatcher: the single owner of pool state
//!
//! One dispatcher task runs per pool generation. It owns the worker table,
//! the idle set and the FIFO queue, and is the only place a pending task is
//! resolved, so every task resolves exactly once.

use crate::config::{PoolConfig, RestartPolicy};
use crate::error::PoolError;
use crate::lifecycle::{PoolState, PoolStatus};
use crate::pipeline::Pipeline;
use crate::worker::{self, Assignment, ExitReason, WorkerEvent, WorkerHandle, WorkerState};
use sq_adapters::Codec;
use sq_core::{JobDescriptor, TaskId, TranscodeOutput, WorkerId};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;

pub(crate) type TaskResult = Result<TranscodeOutput, PoolError>;

/// A submitted job waiting for its result
pub(crate) struct PendingTask {
    id: TaskId,
    job: JobDescriptor,
    completion: oneshot::Sender<TaskResult>,
}

impl PendingTask {
    pub fn new(id: TaskId, job: JobDescriptor) -> (Self, oneshot::Receiver<TaskResult>) {
        let (completion, rx) = oneshot::channel();
        (
            Self {
                id,
                job,
                completion,
            },
            rx,
        )
    }

    fn resolve(self, result: TaskResult) {
        // The caller may have stopped waiting
        let _ = self.completion.send(result);
    }
}

pub(crate) enum Command {
    Submit(PendingTask),
    Terminate { done: oneshot::Sender<()> },
}

struct WorkerSlot {
    /// `None` once shutdown has closed the job channel
    handle: Option<WorkerHandle>,
    state: WorkerState,
    task: Option<PendingTask>,
}

pub(crate) struct Dispatcher<C> {
    generation: u64,
    pipeline: Arc<Pipeline<C>>,
    pool_size: usize,
    max_queue: Option<usize>,
    restart: RestartPolicy,
    shutdown_grace: Duration,
    state: PoolState,
    workers: BTreeMap<WorkerId, WorkerSlot>,
    idle: VecDeque<WorkerId>,
    queue: VecDeque<PendingTask>,
    next_worker: u32,
    events_tx: mpsc::UnboundedSender<WorkerEvent>,
    events_rx: mpsc::UnboundedReceiver<WorkerEvent>,
    commands: mpsc::UnboundedReceiver<Command>,
    /// Error handed to submissions that arrive after this generation ended
    closed_error: PoolError,
    completed: u64,
    failed: u64,
    crashed: u64,
    status: Arc<watch::Sender<PoolStatus>>,
}

impl<C: Codec> Dispatcher<C> {
    pub fn new(
        generation: u64,
        pipeline: Arc<Pipeline<C>>,
        config: &PoolConfig,
        commands: mpsc::UnboundedReceiver<Command>,
        status: Arc<watch::Sender<PoolStatus>>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let prior = *status.borrow();
        Self {
            generation,
            pipeline,
            pool_size: config.pool_size.max(1),
            max_queue: config.max_queue,
            restart: config.restart,
            shutdown_grace: config.shutdown_grace,
            state: PoolState::Uninitialized,
            workers: BTreeMap::new(),
            idle: VecDeque::new(),
            queue: VecDeque::new(),
            next_worker: 0,
            events_tx,
            events_rx,
            commands,
            closed_error: PoolError::Terminated,
            completed: prior.completed,
            failed: prior.failed,
            crashed: prior.crashed,
            status,
        }
    }

    pub async fn run(mut self) {
        self.state = PoolState::Initializing;
        for _ in 0..self.pool_size {
            self.spawn_worker();
        }
        tracing::info!(
            generation = self.generation,
            pool_size = self.workers.len(),
            "worker pool initializing"
        );
        self.check_workers();
        self.publish();

        while self.state.is_live() {
            tokio::select! {
                Some(event) = self.events_rx.recv() => self.on_event(event),
                command = self.commands.recv() => match command {
                    Some(Command::Submit(task)) => self.on_submit(task),
                    Some(Command::Terminate { done }) => {
                        self.shutdown().await;
                        let _ = done.send(());
                    }
                    // Every pool handle is gone
                    None => self.shutdown().await,
                },
            }
        }

        self.drain();
    }

    fn spawn_worker(&mut self) {
        let id = WorkerId(self.next_worker);
        self.next_worker += 1;
        match worker::spawn(id, Arc::clone(&self.pipeline), self.events_tx.clone()) {
            Ok(handle) => {
                tracing::debug!(worker = %id, "worker spawned");
                self.workers.insert(
                    id,
                    WorkerSlot {
                        handle: Some(handle),
                        state: WorkerState::Starting,
                        task: None,
                    },
                );
            }
            Err(err) => tracing::error!(worker = %id, error = %err, "failed to spawn worker"),
        }
    }

    fn on_submit(&mut self, task: PendingTask) {
        if let Some(capacity) = self.max_queue {
            if self.idle.is_empty() && self.queue.len() >= capacity {
                tracing::warn!(task = %task.id, capacity, "queue full, rejecting job");
                self.complete(task, Err(PoolError::Saturated { capacity }));
                self.publish();
                return;
            }
        }
        tracing::debug!(task = %task.id, job = %task.job.id(), "job queued");
        self.queue.push_back(task);
        self.dispatch();
        self.publish();
    }

    fn on_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Ready { worker } => {
                if let Some(slot) = self.workers.get_mut(&worker) {
                    if slot.state == WorkerState::Starting {
                        slot.state = WorkerState::Idle;
                        if self.state.is_live() {
                            self.idle.push_back(worker);
                        }
                    }
                }
                self.maybe_running();
            }
            WorkerEvent::Finished {
                worker,
                task,
                result,
            } => self.on_finished(worker, task, result.map_err(PoolError::from)),
            WorkerEvent::Exited { worker, reason } => self.on_exit(worker, reason),
        }
        self.dispatch();
        self.publish();
    }

    fn on_finished(&mut self, worker: WorkerId, task: TaskId, result: TaskResult) {
        let Some(slot) = self.workers.get_mut(&worker) else {
            tracing::warn!(%worker, %task, "result from unknown worker");
            return;
        };
        let pending = match slot.task.take() {
            Some(pending) if pending.id == task => pending,
            other => {
                slot.task = other;
                tracing::warn!(%worker, %task, "result for a task the worker does not hold");
                return;
            }
        };
        slot.state = WorkerState::Idle;
        if self.state.is_live() {
            self.idle.push_back(worker);
        }
        self.complete(pending, result);
    }

    fn on_exit(&mut self, worker: WorkerId, reason: ExitReason) {
        self.idle.retain(|id| *id != worker);
        let Some(slot) = self.workers.remove(&worker) else {
            return;
        };
        let unexpected = self.state.is_live();

        let message = match reason {
            ExitReason::Panicked { task, message } => {
                self.crashed += 1;
                tracing::error!(%worker, %task, %message, "worker crashed");
                Some(message)
            }
            ExitReason::Stopped if unexpected || slot.task.is_some() => {
                tracing::warn!(%worker, "worker exited unexpectedly");
                Some("worker exited unexpectedly".to_string())
            }
            ExitReason::Stopped => {
                tracing::debug!(%worker, "worker stopped");
                None
            }
        };

        if let Some(pending) = slot.task {
            let message = message.unwrap_or_else(|| "worker exited".to_string());
            self.complete(pending, Err(PoolError::WorkerCrashed { worker, message }));
        }

        if unexpected {
            if self.restart == RestartPolicy::Replace {
                self.spawn_worker();
            }
            self.check_workers();
            self.maybe_running();
        }
    }

    /// A generation with no workers left cannot make progress: fail what is
    /// queued and end the generation.
    fn check_workers(&mut self) {
        if !self.state.is_live() || !self.workers.is_empty() {
            return;
        }
        let reason = "all workers have exited".to_string();
        tracing::error!(queued = self.queue.len(), "{reason}");
        self.closed_error = PoolError::NoWorkers(reason);
        self.commands.close();
        while let Some(task) = self.queue.pop_front() {
            let error = self.closed_error.clone();
            self.complete(task, Err(error));
        }
        self.state = PoolState::Terminated;
    }

    fn maybe_running(&mut self) {
        if self.state == PoolState::Initializing
            && self
                .workers
                .values()
                .all(|slot| slot.state != WorkerState::Starting)
        {
            self.state = PoolState::Running;
            tracing::info!(workers = self.workers.len(), "worker pool running");
        }
    }

    /// Hand queued jobs to idle workers in submission order
    fn dispatch(&mut self) {
        if !self.state.is_live() {
            return;
        }
        while !self.queue.is_empty() {
            let Some(worker) = self.idle.pop_front() else {
                break;
            };
            let Some(slot) = self.workers.get_mut(&worker) else {
                continue;
            };
            let Some(handle) = slot.handle.as_ref() else {
                continue;
            };
            let Some(task) = self.queue.pop_front() else {
                break;
            };
            let assignment = Assignment {
                task: task.id,
                job: task.job.clone(),
            };
            match handle.assign(assignment) {
                Ok(()) => {
                    tracing::debug!(%worker, task = %task.id, "job assigned");
                    slot.state = WorkerState::Busy;
                    slot.task = Some(task);
                }
                Err(_) => {
                    // Thread already gone; its exit event is on the way
                    slot.state = WorkerState::Dead;
                    self.queue.push_front(task);
                }
            }
        }
    }

    fn complete(&mut self, task: PendingTask, result: TaskResult) {
        match &result {
            Ok(output) => {
                self.completed += 1;
                tracing::debug!(
                    task = %task.id,
                    job = %task.job.id(),
                    compressed_size = output.compressed_size,
                    compression_ratio = output.compression_ratio,
                    "job completed"
                );
            }
            Err(err) => {
                self.failed += 1;
                tracing::debug!(task = %task.id, job = %task.job.id(), error = %err, "job failed");
            }
        }
        task.resolve(result);
    }

    /// Fail queued jobs, give in-flight jobs the grace period, then abandon
    /// whatever is still running.
    async fn shutdown(&mut self) {
        if !self.state.is_live() {
            return;
        }
        tracing::info!(
            queued = self.queue.len(),
            busy = self.busy(),
            "worker pool terminating"
        );
        self.state = PoolState::Terminating;
        self.commands.close();
        self.idle.clear();
        self.publish();
        while let Some(task) = self.queue.pop_front() {
            self.complete(task, Err(PoolError::Terminated));
        }
        for slot in self.workers.values_mut() {
            slot.handle = None;
        }
        self.publish();

        let deadline = Instant::now() + self.shutdown_grace;
        while self.busy() > 0 {
            match tokio::time::timeout_at(deadline, self.events_rx.recv()).await {
                Ok(Some(event)) => self.on_event(event),
                Ok(None) | Err(_) => break,
            }
        }

        let workers = std::mem::take(&mut self.workers);
        for (worker, slot) in workers {
            if let Some(task) = slot.task {
                tracing::warn!(%worker, task = %task.id, "abandoning in-flight job");
                self.complete(task, Err(PoolError::Terminated));
            }
        }
        self.state = PoolState::Terminated;
        self.publish();
        tracing::info!("worker pool terminated");
    }

    /// Resolve submissions that raced with the end of this generation
    fn drain(&mut self) {
        self.commands.close();
        while let Ok(command) = self.commands.try_recv() {
            match command {
                Command::Submit(task) => {
                    let error = self.closed_error.clone();
                    self.complete(task, Err(error));
                }
                Command::Terminate { done } => {
                    let _ = done.send(());
                }
            }
        }
        self.publish();
    }

    fn busy(&self) -> usize {
        self.workers
            .values()
            .filter(|slot| slot.task.is_some())
            .count()
    }

    /// Publish a snapshot unless a newer generation has taken over
    fn publish(&self) {
        let snapshot = PoolStatus {
            generation: self.generation,
            state: self.state,
            workers: self.workers.len(),
            idle: self.idle.len(),
            busy: self.busy(),
            queued: self.queue.len(),
            completed: self.completed,
            failed: self.failed,
            crashed: self.crashed,
        };
        self.status.send_if_modified(|current| {
            if current.generation > self.generation || *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }
}
