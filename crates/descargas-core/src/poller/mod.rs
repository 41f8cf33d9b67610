//! Cancellable status polling for one task.
//!
//! [`spawn`] starts a tokio task that asks for the task's status on a fixed
//! interval and reports each result as a [`PollEvent`]. The loop ends on a
//! terminal status, on the first failed request, or when its [`PollHandle`]
//! is cancelled or dropped. Requests are serialized: a slow response delays
//! the next tick instead of overlapping with it. The event channel is
//! unbounded, so a consumer that reads late never slows the cadence down.

mod run;

#[cfg(test)]
mod tests;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::{SharedTaskApi, TaskId};
use crate::config::DEFAULT_POLL_INTERVAL_MS;
use crate::status::{TaskStatus, TerminalStatuses};

/// Message shown when the status endpoint answers with a non-2xx status.
pub const POLL_FAILED_MESSAGE: &str = "Error consultando tarea";

#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Fixed delay between requests; also the delay before the first one.
    pub interval: Duration,
    pub terminal: TerminalStatuses,
}

impl PollSettings {
    /// A zero interval is raised to one millisecond.
    pub fn new(interval: Duration, terminal: TerminalStatuses) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            terminal,
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            TerminalStatuses::default(),
        )
    }
}

/// One tick's result, in the order the ticks happened.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// Non-terminal status; polling continues.
    Progress(TaskStatus),
    /// Terminal status; this is the last event of the loop.
    Completed(TaskStatus),
    /// Request failed; this is the last event of the loop.
    Failed(String),
}

impl PollEvent {
    pub fn is_final(&self) -> bool {
        !matches!(self, PollEvent::Progress(_))
    }
}

/// How a poll loop ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Completed(TaskStatus),
    Failed(String),
    /// Stopped from outside (handle cancelled/dropped, or the event receiver went away).
    Cancelled,
}

/// Owner of a running poll loop. Dropping it stops the loop.
pub struct PollHandle {
    task_id: TaskId,
    abort: Arc<AtomicBool>,
    join: Option<JoinHandle<PollOutcome>>,
}

impl PollHandle {
    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Stops the loop. A request already in flight may finish, but its result
    /// is discarded and no further request is made.
    pub fn cancel(&mut self) {
        self.abort.store(true, Ordering::Relaxed);
        if let Some(join) = &self.join {
            join.abort();
        }
    }

    /// Waits for the loop to end.
    pub async fn join(mut self) -> PollOutcome {
        match self.join.take() {
            Some(join) => join.await.unwrap_or(PollOutcome::Cancelled),
            None => PollOutcome::Cancelled,
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Starts polling `task_id`. Events go to the returned receiver.
pub fn spawn(
    api: SharedTaskApi,
    task_id: TaskId,
    settings: PollSettings,
) -> (PollHandle, mpsc::UnboundedReceiver<PollEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let abort = Arc::new(AtomicBool::new(false));
    let interval_ms = settings.interval.as_millis() as u64;
    tracing::debug!(task_id = %task_id, interval_ms, "poll loop starting");
    let join = tokio::spawn(run::poll_loop(
        api,
        task_id.clone(),
        settings,
        tx,
        Arc::clone(&abort),
    ));
    let handle = PollHandle {
        task_id,
        abort,
        join: Some(join),
    };
    (handle, rx)
}
