//! Fetching the PDF/Excel artifacts a completed task links to.
//!
//! Links come straight from the status response and may be absolute or
//! relative to the backend base URL. The body is streamed into a `.part` file
//! in the destination directory and renamed once the transfer succeeded.

mod name;

pub use name::{choose_filename, sanitize_filename};

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str;
use url::Url;

use crate::api::HttpOptions;
use crate::view::UiState;

/// Temporary file suffix used before the final rename.
pub const TEMP_SUFFIX: &str = ".part";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Pdf,
    Excel,
}

impl ArtifactKind {
    /// Extension used when the server gives no better name.
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "pdf",
            ArtifactKind::Excel => "xlsx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "PDF",
            ArtifactKind::Excel => "Excel",
        }
    }
}

/// Links currently shown in the view, PDF first.
pub fn links(state: &UiState) -> Vec<(ArtifactKind, String)> {
    let mut out = Vec::new();
    if let Some(pdf) = &state.pdf_link {
        out.push((ArtifactKind::Pdf, pdf.clone()));
    }
    if let Some(excel) = &state.excel_link {
        out.push((ArtifactKind::Excel, excel.clone()));
    }
    out
}

/// Resolves a link against the backend base URL (absolute links pass through).
pub fn resolve_link(base: &Url, link: &str) -> Result<Url> {
    base.join(link.trim())
        .with_context(|| format!("invalid artifact link: {}", link))
}

/// Downloads `url` into `dest_dir` and returns the final path.
///
/// `stem` names the file when neither Content-Disposition nor the link give a
/// usable filename. An existing file with the same name is replaced.
/// Runs in the current thread; use [`fetch`] from async code.
pub fn fetch_blocking(
    url: &Url,
    kind: ArtifactKind,
    stem: &str,
    dest_dir: &Path,
    options: &HttpOptions,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("failed to create {}", dest_dir.display()))?;
    let temp_path = dest_dir.join(format!(
        ".{}.{}{}",
        sanitize_filename(stem),
        kind.extension(),
        TEMP_SUFFIX
    ));
    let mut file = File::create(&temp_path)
        .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;

    let mut disposition: Option<String> = None;
    let mut write_error: Option<std::io::Error> = None;
    let mut written = 0u64;

    let mut easy = curl::easy::Easy::new();
    easy.url(url.as_str()).context("invalid URL")?;
    easy.get(true)?;
    easy.max_redirections(10)?;
    options.configure(&mut easy, &[])?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(line) = str::from_utf8(data) {
                if let Some((name, value)) = line.trim_end().split_once(':') {
                    if name.trim().eq_ignore_ascii_case("content-disposition") {
                        disposition = Some(value.trim().to_string());
                    }
                }
            }
            true
        })?;
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                tracing::warn!("artifact write failed: {}", e);
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    let cleanup = |e: anyhow::Error| {
        let _ = std::fs::remove_file(&temp_path);
        e
    };

    if let Some(e) = write_error {
        return Err(cleanup(anyhow::Error::new(e).context("failed to write artifact")));
    }
    performed
        .context("GET request failed")
        .map_err(cleanup)?;
    let code = easy.response_code().context("no response code").map_err(cleanup)?;
    if !(200..300).contains(&code) {
        return Err(cleanup(anyhow::anyhow!("GET {} returned HTTP {}", url, code)));
    }

    file.sync_all().context("artifact sync failed").map_err(cleanup)?;
    drop(file);

    let final_name = choose_filename(url, disposition.as_deref(), stem, kind.extension());
    let final_path = dest_dir.join(final_name);
    std::fs::rename(&temp_path, &final_path)
        .with_context(|| {
            format!(
                "failed to rename {} to {}",
                temp_path.display(),
                final_path.display()
            )
        })
        .map_err(cleanup)?;

    tracing::info!(url = %url, path = %final_path.display(), bytes = written, "{} saved", kind.label());
    Ok(final_path)
}

/// Async wrapper around [`fetch_blocking`].
pub async fn fetch(
    url: Url,
    kind: ArtifactKind,
    stem: String,
    dest_dir: PathBuf,
    options: HttpOptions,
) -> Result<PathBuf> {
    tokio::task::spawn_blocking(move || fetch_blocking(&url, kind, &stem, &dest_dir, &options))
        .await
        .context("artifact task join")?
}
