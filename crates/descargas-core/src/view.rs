//! View state derived from server responses, and its text rendering.

use crate::status::TaskStatus;

const BAR_WIDTH: usize = 20;

/// What the user currently sees for the tracked task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub error: Option<String>,
    pub status: Option<String>,
    /// None until the first status response arrives.
    pub progress: Option<f64>,
    pub pdf_link: Option<String>,
    pub excel_link: Option<String>,
}

impl UiState {
    /// Clears everything; called before a new submission.
    pub fn reset(&mut self) {
        *self = UiState::default();
    }

    /// Progress and status are overwritten; links are only assigned when the
    /// response carries them, so they survive later responses that omit them.
    pub fn apply(&mut self, status: &TaskStatus) {
        self.progress = Some(status.progress);
        self.status = status.status.clone();
        if let Some(pdf) = &status.pdf {
            self.pdf_link = Some(pdf.clone());
        }
        if let Some(excel) = &status.excel {
            self.excel_link = Some(excel.clone());
        }
    }

    /// Shows an error; last known progress and status stay visible.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Lines as displayed, top to bottom.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(err) = self.error.as_deref().filter(|e| !e.is_empty()) {
            lines.push(err.to_string());
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            lines.push(format!("Estado: {}", status));
        }
        if let Some(progress) = self.progress {
            lines.push(progress_bar(progress, BAR_WIDTH));
        }
        if let Some(pdf) = &self.pdf_link {
            lines.push(format!("Descargar PDF: {}", pdf));
        }
        if let Some(excel) = &self.excel_link {
            lines.push(format!("Descargar Excel: {}", excel));
        }
        lines
    }
}

/// `[########............] 40%`. The fill is clamped to 0..=100; the label
/// shows the value as reported.
pub fn progress_bar(progress: f64, width: usize) -> String {
    let fraction = (progress / 100.0).clamp(0.0, 1.0);
    let filled = ((fraction * width as f64).round() as usize).min(width);
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        ".".repeat(width - filled),
        format_percent(progress)
    )
}

fn format_percent(progress: f64) -> String {
    if progress.fract() == 0.0 {
        format!("{:.0}", progress)
    } else {
        format!("{}", progress)
    }
}
