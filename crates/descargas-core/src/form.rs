//! Download request form: credentials plus free-text parameters.
//!
//! Credentials live only in memory for the duration of a submission; nothing
//! here is persisted or logged in clear.

use std::fmt;

use crate::api::CreateTaskRequest;

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything a submit carries. `parameters` is opaque and passed through as-is.
#[derive(Debug, Clone)]
pub struct DownloadForm {
    pub credentials: Credentials,
    pub parameters: String,
}

/// A required field was left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("el usuario es obligatorio")]
    MissingUsername,
    #[error("la clave es obligatoria")]
    MissingPassword,
}

impl DownloadForm {
    pub fn new(credentials: Credentials, parameters: impl Into<String>) -> Self {
        Self {
            credentials,
            parameters: parameters.into(),
        }
    }

    /// Username and password must be non-empty; parameters are optional.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.credentials.username.is_empty() {
            return Err(FormError::MissingUsername);
        }
        if self.credentials.password.is_empty() {
            return Err(FormError::MissingPassword);
        }
        Ok(())
    }

    pub fn to_request(&self) -> CreateTaskRequest {
        CreateTaskRequest {
            usuario: self.credentials.username.clone(),
            clave: self.credentials.password.clone(),
            parametros: self.parameters.clone(),
        }
    }
}
