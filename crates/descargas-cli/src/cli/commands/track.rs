//! `descargas track <id>` – follow an existing task.

use anyhow::Result;
use descargas_core::api::TaskId;
use std::path::PathBuf;

use super::follow::follow;
use super::AppContext;

pub async fn run_track(ctx: &AppContext, id: &str, save_to: Option<PathBuf>) -> Result<()> {
    if id.is_empty() {
        anyhow::bail!("task id must not be empty");
    }
    let mut session = ctx.session();
    session.track(TaskId::new(id));
    println!("Tracking task {id}.");

    let save_to = ctx.save_dir(save_to);
    follow(ctx, &mut session, save_to.as_deref()).await
}
