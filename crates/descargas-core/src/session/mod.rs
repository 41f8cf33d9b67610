//! Download session: one form, one tracked task, one view state.
//!
//! A session submits the form, keeps the resulting task id, and owns the poll
//! loop for that id. Tracking another id replaces (and thereby cancels) the
//! previous loop; dropping the session cancels whatever is running. Poll
//! events are applied to [`UiState`] as they are consumed through
//! [`DownloadSession::next_event`].

mod error;


pub use error::{SubmitError, SUBMIT_FAILED_MESSAGE};

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::api::{SharedTaskApi, TaskId};
use crate::form::DownloadForm;
use crate::poller::{self, PollEvent, PollHandle, PollSettings};
use crate::view::UiState;

struct ActivePoll {
    handle: PollHandle,
    events: mpsc::UnboundedReceiver<PollEvent>,
}

pub struct DownloadSession {
    api: SharedTaskApi,
    settings: PollSettings,
    state: UiState,
    task_id: Option<TaskId>,
    active: Option<ActivePoll>,
}

impl DownloadSession {
    pub fn new(api: SharedTaskApi, settings: PollSettings) -> Self {
        Self {
            api,
            settings,
            state: UiState::default(),
            task_id: None,
            active: None,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Id of the task being (or last) tracked.
    pub fn task_id(&self) -> Option<&TaskId> {
        self.task_id.as_ref()
    }

    /// True while a poll loop may still produce events.
    pub fn is_polling(&self) -> bool {
        self.active.is_some()
    }

    /// Validates the form, clears the view, and sends exactly one creation
    /// request. On success the new task is tracked; on failure the error is
    /// shown and the current task id (if any) is left as it was.
    pub async fn submit(&mut self, form: &DownloadForm) -> Result<TaskId, SubmitError> {
        form.validate()?;
        self.state.reset();

        let api = Arc::clone(&self.api);
        let request = form.to_request();
        tracing::info!(usuario = %request.usuario, "submitting download request");
        let created = tokio::task::spawn_blocking(move || api.create_task(&request))
            .await
            .map_err(|e| SubmitError::Network(format!("create task join: {}", e)))
            .and_then(|r| r.map_err(SubmitError::from));

        match created {
            Ok(id) => {
                self.track(id.clone());
                Ok(id)
            }
            Err(e) => {
                tracing::warn!("submission failed: {}", e);
                self.state.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// Starts polling `id`, cancelling any loop for a previous id.
    pub fn track(&mut self, id: TaskId) {
        self.stop();
        let (handle, events) = poller::spawn(Arc::clone(&self.api), id.clone(), self.settings.clone());
        self.task_id = Some(id);
        self.active = Some(ActivePoll { handle, events });
    }

    /// Cancels the poll loop, if any. The view keeps its last state.
    pub fn stop(&mut self) {
        if let Some(mut active) = self.active.take() {
            let task_id = active.handle.task_id().clone();
            tracing::debug!(task_id = %task_id, "stopping poll loop");
            active.handle.cancel();
        }
    }

    /// Waits for the next poll event, applies it to the view and returns it.
    /// Returns None once the loop has ended (or when nothing is tracked).
    pub async fn next_event(&mut self) -> Option<PollEvent> {
        let active = self.active.as_mut()?;
        match active.events.recv().await {
            Some(event) => {
                match &event {
                    PollEvent::Progress(status) | PollEvent::Completed(status) => {
                        self.state.apply(status)
                    }
                    PollEvent::Failed(message) => self.state.fail(message.clone()),
                }
                if event.is_final() {
                    self.active = None;
                }
                Some(event)
            }
            None => {
                self.active = None;
                None
            }
        }
    }

    /// Consumes events until the loop ends, calling `on_event` after each one
    /// has been applied. Returns the final event, if the loop produced one.
    pub async fn run_until_done<F>(&mut self, mut on_event: F) -> Option<PollEvent>
    where
        F: FnMut(&PollEvent, &UiState),
    {
        let mut last = None;
        while let Some(event) = self.next_event().await {
            on_event(&event, &self.state);
            last = Some(event);
        }
        last
    }
}
