//! Scripted in-memory [`TaskApi`] for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{ApiError, CreateTaskRequest, TaskApi, TaskId};

/// Replies are consumed in order; an exhausted script answers HTTP 404.
#[derive(Default)]
pub(crate) struct ScriptedApi {
    creates: Mutex<VecDeque<Result<TaskId, ApiError>>>,
    statuses: Mutex<VecDeque<Result<serde_json::Value, ApiError>>>,
    create_calls: Mutex<Vec<CreateTaskRequest>>,
    status_calls: Mutex<Vec<TaskId>>,
}

impl ScriptedApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_create(self, reply: Result<TaskId, ApiError>) -> Self {
        self.creates.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn on_status(self, reply: Result<serde_json::Value, ApiError>) -> Self {
        self.statuses.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn create_calls(&self) -> Vec<CreateTaskRequest> {
        self.create_calls.lock().unwrap().clone()
    }

    pub(crate) fn status_calls(&self) -> Vec<TaskId> {
        self.status_calls.lock().unwrap().clone()
    }
}

impl TaskApi for ScriptedApi {
    fn create_task(&self, request: &CreateTaskRequest) -> Result<TaskId, ApiError> {
        self.create_calls.lock().unwrap().push(request.clone());
        self.creates
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ApiError::Status(404)))
    }

    fn task_status(&self, id: &TaskId) -> Result<serde_json::Value, ApiError> {
        self.status_calls.lock().unwrap().push(id.clone());
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ApiError::Status(404)))
    }
}
