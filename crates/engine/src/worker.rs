// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker threads
//!
//! Each worker is a dedicated OS thread that runs one job at a time. Jobs
//! arrive over a blocking channel; results flow back to the dispatcher over
//! an async channel tagged with the task id. A panic inside the pipeline
//! ends the thread; the dispatcher decides what happens next.

use crate::pipeline::Pipeline;
use sq_adapters::{Codec, CodecError};
use sq_core::{JobDescriptor, TaskId, TranscodeOutput, WorkerId};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc as std_mpsc, Arc};
use tokio::sync::mpsc;

/// Dispatcher-side view of a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Spawned, has not reported ready yet
    Starting,
    Idle,
    Busy,
    Dead,
}

/// A job handed to a worker
pub(crate) struct Assignment {
    pub task: TaskId,
    pub job: JobDescriptor,
}

/// Messages from worker threads to the dispatcher
#[derive(Debug)]
pub(crate) enum WorkerEvent {
    Ready {
        worker: WorkerId,
    },
    Finished {
        worker: WorkerId,
        task: TaskId,
        result: Result<TranscodeOutput, CodecError>,
    },
    Exited {
        worker: WorkerId,
        reason: ExitReason,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExitReason {
    /// Job channel closed
    Stopped,
    /// The pipeline panicked while running `task`
    Panicked { task: TaskId, message: String },
}

/// Owning handle for a worker thread. Dropping it closes the job channel,
/// which lets an idle worker exit.
pub(crate) struct WorkerHandle {
    jobs: std_mpsc::Sender<Assignment>,
}

impl WorkerHandle {
    /// Hand over a job. Gives the assignment back if the thread is gone.
    pub fn assign(&self, assignment: Assignment) -> Result<(), Assignment> {
        self.jobs.send(assignment).map_err(|err| err.0)
    }
}

pub(crate) fn spawn<C: Codec>(
    id: WorkerId,
    pipeline: Arc<Pipeline<C>>,
    events: mpsc::UnboundedSender<WorkerEvent>,
) -> std::io::Result<WorkerHandle> {
    let (jobs, rx) = std_mpsc::channel();
    std::thread::Builder::new()
        .name(format!("sq-{id}"))
        .spawn(move || {
            let reason = run(id, &pipeline, &rx, &events);
            let _ = events.send(WorkerEvent::Exited { worker: id, reason });
        })?;
    Ok(WorkerHandle { jobs })
}

fn run<C: Codec>(
    id: WorkerId,
    pipeline: &Pipeline<C>,
    jobs: &std_mpsc::Receiver<Assignment>,
    events: &mpsc::UnboundedSender<WorkerEvent>,
) -> ExitReason {
    if events.send(WorkerEvent::Ready { worker: id }).is_err() {
        return ExitReason::Stopped;
    }
    while let Ok(Assignment { task, job }) = jobs.recv() {
        tracing::debug!(worker = %id, %task, job = %job.id(), "job started");
        match panic::catch_unwind(AssertUnwindSafe(|| pipeline.run(&job))) {
            Ok(result) => {
                let finished = WorkerEvent::Finished {
                    worker: id,
                    task,
                    result,
                };
                if events.send(finished).is_err() {
                    return ExitReason::Stopped;
                }
            }
            Err(payload) => {
                return ExitReason::Panicked {
                    task,
                    message: panic_message(payload.as_ref()),
                }
            }
        }
    }
    ExitReason::Stopped
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
