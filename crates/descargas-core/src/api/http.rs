//! libcurl implementation of [`TaskApi`].

use std::time::Duration;
use url::Url;

use super::{ApiError, CreateTaskRequest, TaskApi, TaskId};

/// Connection settings shared by task API calls and artifact fetches.
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    /// Sent as `Authorization: Bearer <token>` when set.
    pub api_token: Option<String>,
    pub connect_timeout: Option<Duration>,
    /// None = no client-side timeout; a hung request delays its caller indefinitely.
    pub request_timeout: Option<Duration>,
}

impl HttpOptions {
    /// Apply timeouts and headers to an easy handle. `extra` lines are
    /// appended after the auth header.
    pub(crate) fn configure(&self, easy: &mut curl::easy::Easy, extra: &[&str]) -> Result<(), curl::Error> {
        easy.follow_location(true)?;
        if let Some(t) = self.connect_timeout {
            easy.connect_timeout(t)?;
        }
        if let Some(t) = self.request_timeout {
            easy.timeout(t)?;
        }

        let mut list = curl::easy::List::new();
        if let Some(token) = &self.api_token {
            list.append(&format!("Authorization: Bearer {}", token.trim()))?;
        }
        for line in extra {
            list.append(line)?;
        }
        easy.http_headers(list)?;
        Ok(())
    }
}

/// Task API over HTTP using libcurl easy handles (one per request).
#[derive(Debug, Clone)]
pub struct CurlTaskApi {
    base: Url,
    options: HttpOptions,
}

impl CurlTaskApi {
    /// `base_url` must be an http(s) URL; a missing trailing slash is added so
    /// that endpoint paths are appended rather than replacing the last segment.
    pub fn new(base_url: &str, options: HttpOptions) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Url(format!("{} cannot be a base URL", base_url)));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base, options })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub(crate) fn create_url(&self) -> Result<Url, ApiError> {
        Ok(self.base.join("descargas")?)
    }

    /// `tareas/{id}` with the id percent-encoded as a single path segment.
    pub(crate) fn status_url(&self, id: &TaskId) -> Result<Url, ApiError> {
        let mut url = self.base.join("tareas/")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }

    /// Runs one request and returns (status code, body).
    fn perform(&self, easy: &mut curl::easy::Easy) -> Result<(u32, Vec<u8>), ApiError> {
        let mut body = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }
        let code = easy.response_code()?;
        Ok((code, body))
    }
}

fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}

impl TaskApi for CurlTaskApi {
    fn create_task(&self, request: &CreateTaskRequest) -> Result<TaskId, ApiError> {
        let url = self.create_url()?;
        let payload = serde_json::to_vec(request)?;

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.post(true)?;
        easy.post_fields_copy(&payload)?;
        self.options.configure(
            &mut easy,
            &["Content-Type: application/json", "Accept: application/json"],
        )?;

        tracing::debug!(url = %url, usuario = %request.usuario, "creating task");
        let (code, body) = self.perform(&mut easy)?;
        if !is_success(code) {
            tracing::warn!(url = %url, code, "task creation rejected");
            return Err(ApiError::Status(code));
        }
        let id = TaskId::from_response(&body)?;
        tracing::info!(task_id = %id, "task created");
        Ok(id)
    }

    fn task_status(&self, id: &TaskId) -> Result<serde_json::Value, ApiError> {
        let url = self.status_url(id)?;

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.get(true)?;
        self.options.configure(&mut easy, &["Accept: application/json"])?;

        let (code, body) = self.perform(&mut easy)?;
        if !is_success(code) {
            tracing::warn!(task_id = %id, code, "status request failed");
            return Err(ApiError::Status(code));
        }
        Ok(serde_json::from_slice(&body)?)
    }
}
