//! Task API consumed from the backend.
//!
//! Two endpoints: `POST /descargas` creates a task and `GET /tareas/{id}`
//! reports its status. [`TaskApi`] is the seam between the session/poller and
//! the transport; [`CurlTaskApi`] is the libcurl implementation. Calls are
//! blocking; async callers go through `spawn_blocking`.

mod error;
mod http;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use error::ApiError;
pub use http::{CurlTaskApi, HttpOptions};
pub use types::{CreateTaskRequest, TaskId};

use std::sync::Arc;

/// Backend operations used by a download session.
pub trait TaskApi: Send + Sync + 'static {
    /// Issues one creation request and returns the new task's id.
    fn create_task(&self, request: &CreateTaskRequest) -> Result<TaskId, ApiError>;

    /// Fetches the raw status body for a task. Normalization happens in
    /// [`crate::status`], not here.
    fn task_status(&self, id: &TaskId) -> Result<serde_json::Value, ApiError>;
}

/// Shared handle passed to the poller and session.
pub type SharedTaskApi = Arc<dyn TaskApi>;
