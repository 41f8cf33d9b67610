//! Canonical task status.
//!
//! The backend answers `GET /tareas/{id}` with loosely shaped JSON (Spanish or
//! English key names depending on the deployment). [`TaskStatus::from_value`]
//! is the single place that knows about those spellings; everything past it
//! works with the canonical record.

mod normalize;

use std::collections::BTreeSet;

/// Normalized view of one status response.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStatus {
    /// Percentage reported by the backend (0 when absent).
    pub progress: f64,
    /// Backend state string, if any.
    pub status: Option<String>,
    /// PDF artifact link, only when present and non-empty.
    pub pdf: Option<String>,
    /// Excel artifact link, only when present and non-empty.
    pub excel: Option<String>,
}

impl TaskStatus {
    pub fn is_terminal(&self, terminal: &TerminalStatuses) -> bool {
        self.status
            .as_deref()
            .map(|s| terminal.contains(s))
            .unwrap_or(false)
    }
}

/// Status values after which no further progress updates will occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalStatuses(BTreeSet<String>);

impl TerminalStatuses {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TerminalStatuses(markers.into_iter().map(Into::into).collect())
    }

    /// Exact, case-sensitive match.
    pub fn contains(&self, status: &str) -> bool {
        self.0.contains(status)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}

impl Default for TerminalStatuses {
    fn default() -> Self {
        TerminalStatuses::new(["completado", "done"])
    }
}
