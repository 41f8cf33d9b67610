//! The poll loop body.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::{PollEvent, PollOutcome, PollSettings, POLL_FAILED_MESSAGE};
use crate::api::{ApiError, SharedTaskApi, TaskId};
use crate::status::TaskStatus;

pub(super) async fn poll_loop(
    api: SharedTaskApi,
    task_id: TaskId,
    settings: PollSettings,
    events: mpsc::UnboundedSender<PollEvent>,
    abort: Arc<AtomicBool>,
) -> PollOutcome {
    let mut ticker = interval_at(Instant::now() + settings.interval, settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut ticks = 0u64;
    loop {
        ticker.tick().await;
        if abort.load(Ordering::Relaxed) {
            return PollOutcome::Cancelled;
        }
        ticks += 1;

        let result = fetch_status(&api, &task_id).await;
        if abort.load(Ordering::Relaxed) {
            tracing::debug!(task_id = %task_id, "discarding response after cancel");
            return PollOutcome::Cancelled;
        }

        let (event, outcome) = match result {
            Ok(status) if status.is_terminal(&settings.terminal) => {
                tracing::info!(task_id = %task_id, ticks, status = ?status.status, "task reached terminal status");
                (
                    PollEvent::Completed(status.clone()),
                    Some(PollOutcome::Completed(status)),
                )
            }
            Ok(status) => {
                tracing::debug!(task_id = %task_id, ticks, progress = status.progress, status = ?status.status, "task progress");
                (PollEvent::Progress(status), None)
            }
            Err(message) => {
                tracing::warn!(task_id = %task_id, ticks, "polling stopped: {}", message);
                (
                    PollEvent::Failed(message.clone()),
                    Some(PollOutcome::Failed(message)),
                )
            }
        };

        if events.send(event).is_err() {
            tracing::debug!(task_id = %task_id, "event receiver gone; stopping");
            return PollOutcome::Cancelled;
        }
        if let Some(outcome) = outcome {
            return outcome;
        }
    }
}

/// One status request on the blocking pool, mapped to a user-facing message on failure.
async fn fetch_status(api: &SharedTaskApi, task_id: &TaskId) -> Result<TaskStatus, String> {
    let api = Arc::clone(api);
    let id = task_id.clone();
    let joined = tokio::task::spawn_blocking(move || api.task_status(&id)).await;
    match joined {
        Ok(Ok(body)) => Ok(TaskStatus::from_value(&body)),
        Ok(Err(e)) => Err(poll_error_message(&e)),
        Err(e) => Err(format!("status task join: {}", e)),
    }
}

/// Non-2xx gets the generic message; everything else carries its own.
pub(crate) fn poll_error_message(e: &ApiError) -> String {
    match e {
        ApiError::Status(_) => POLL_FAILED_MESSAGE.to_string(),
        other => other.to_string(),
    }
}
