//! Shared tail of `submit` and `track`: render poll events, then save artifacts.

use anyhow::Result;
use descargas_core::artifact;
use descargas_core::poller::PollEvent;
use descargas_core::session::DownloadSession;
use descargas_core::view::UiState;
use std::path::Path;

use super::AppContext;

/// One line per event: error, status and bar side by side.
fn print_state(ui: &UiState) {
    let lines = ui.render();
    if !lines.is_empty() {
        println!("  {}", lines.join("  "));
    }
}

/// Polls until the task finishes. On completion, artifacts are saved into
/// `save_to` when given. A failed poll is returned as an error.
pub(super) async fn follow(
    ctx: &AppContext,
    session: &mut DownloadSession,
    save_to: Option<&Path>,
) -> Result<()> {
    let last = session.run_until_done(|_, ui| print_state(ui)).await;

    match last {
        Some(PollEvent::Completed(_)) => {
            let links = artifact::links(session.state());
            if links.is_empty() {
                println!("Task finished without artifacts.");
            }
            let Some(dir) = save_to else {
                return Ok(());
            };
            let stem = session
                .task_id()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "descarga".to_string());
            for (kind, link) in links {
                let url = artifact::resolve_link(ctx.base_url(), &link)?;
                let path = artifact::fetch(
                    url,
                    kind,
                    stem.clone(),
                    dir.to_path_buf(),
                    ctx.options.clone(),
                )
                .await?;
                println!("Saved {} to {}", kind.label(), path.display());
            }
            Ok(())
        }
        Some(PollEvent::Failed(message)) => Err(anyhow::anyhow!(message)),
        Some(PollEvent::Progress(_)) | None => {
            tracing::debug!("poll loop ended without a final event");
            Ok(())
        }
    }
}
