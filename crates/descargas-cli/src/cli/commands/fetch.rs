//! `descargas fetch <link>` – download a single artifact.

use anyhow::Result;
use descargas_core::artifact::{self, ArtifactKind};
use std::path::PathBuf;

use super::AppContext;

pub async fn run_fetch(
    ctx: &AppContext,
    link: &str,
    dir: Option<PathBuf>,
    kind: ArtifactKind,
    name: &str,
) -> Result<()> {
    let url = artifact::resolve_link(ctx.base_url(), link)?;
    let dir = match dir {
        Some(d) => d,
        None => std::env::current_dir()?,
    };
    let path = artifact::fetch(url, kind, name.to_string(), dir, ctx.options.clone()).await?;
    println!("Saved {} to {}", kind.label(), path.display());
    Ok(())
}
