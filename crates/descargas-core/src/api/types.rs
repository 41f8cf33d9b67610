//! Wire types for the task API.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ApiError;

/// Body of `POST /descargas`. Field names are the backend's.
#[derive(Clone, Serialize)]
pub struct CreateTaskRequest {
    pub usuario: String,
    pub clave: String,
    pub parametros: String,
}

impl fmt::Debug for CreateTaskRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateTaskRequest")
            .field("usuario", &self.usuario)
            .field("clave", &"<redacted>")
            .field("parametros", &self.parametros)
            .finish()
    }
}

/// Opaque identifier of a backend task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        TaskId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses a creation response body. The id may be a JSON string or a
    /// number; null, empty or missing ids are rejected.
    pub fn from_response(body: &[u8]) -> Result<TaskId, ApiError> {
        #[derive(Deserialize)]
        struct Created {
            #[serde(default)]
            id: serde_json::Value,
        }

        let created: Created = serde_json::from_slice(body)?;
        match created.id {
            serde_json::Value::String(s) if !s.is_empty() => Ok(TaskId(s)),
            serde_json::Value::Number(n) => Ok(TaskId(n.to_string())),
            _ => Err(ApiError::MissingId),
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}
