//! CLI for the descargas client.

mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use descargas_core::artifact::ArtifactKind;
use descargas_core::config::{self, DescargasConfig};
use std::path::PathBuf;

use commands::{run_completions, run_fetch, run_submit, run_track, AppContext};

/// Top-level CLI: submit download requests and follow their tasks.
#[derive(Debug, Parser)]
#[command(name = "descargas")]
#[command(about = "Submit download requests and track their report tasks", long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides `base_url` from config.toml).
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Poll interval in milliseconds (overrides `poll_interval_ms`).
    #[arg(long, global = true, value_name = "MS")]
    pub interval_ms: Option<u64>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Start a download task and follow it until it finishes.
    Submit {
        /// Backend username.
        #[arg(long)]
        usuario: String,
        /// Backend password. Read from stdin when omitted.
        #[arg(long)]
        clave: Option<String>,
        /// Free-form download parameters, passed through unmodified.
        #[arg(long, default_value = "")]
        parametros: String,
        /// Print the task id and exit without polling.
        #[arg(long)]
        no_wait: bool,
        /// Save the PDF/Excel artifacts into this directory on completion.
        #[arg(long, value_name = "DIR")]
        save_to: Option<PathBuf>,
    },

    /// Follow an existing task by its ID.
    Track {
        /// Task identifier returned by `submit`.
        id: String,
        /// Save the PDF/Excel artifacts into this directory on completion.
        #[arg(long, value_name = "DIR")]
        save_to: Option<PathBuf>,
    },

    /// Download one artifact link (absolute, or relative to the base URL).
    Fetch {
        /// Link as reported by the task status.
        link: String,
        /// Destination directory (default: current directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Artifact type, used for the fallback file extension.
        #[arg(long, value_enum, default_value_t = KindArg::Pdf)]
        kind: KindArg,
        /// File stem when the server does not suggest a name.
        #[arg(long, default_value = "descarga")]
        name: String,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Pdf,
    Excel,
}

impl From<KindArg> for ArtifactKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Pdf => ArtifactKind::Pdf,
            KindArg::Excel => ArtifactKind::Excel,
        }
    }
}

/// Applies `--base-url` / `--interval-ms` on top of the loaded config.
fn apply_overrides(
    mut cfg: DescargasConfig,
    base_url: Option<String>,
    interval_ms: Option<u64>,
) -> Result<DescargasConfig> {
    if let Some(url) = base_url {
        cfg.base_url = url;
    }
    if let Some(ms) = interval_ms {
        cfg.poll_interval_ms = ms;
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Loads config and builds the backend context. Only commands that talk to
/// the backend call this.
fn load_context(base_url: Option<String>, interval_ms: Option<u64>) -> Result<AppContext> {
    let cfg = apply_overrides(config::load_or_init()?, base_url, interval_ms)?;
    tracing::debug!("loaded config: {:?}", cfg);
    AppContext::new(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let Cli {
            base_url,
            interval_ms,
            command,
        } = Cli::parse();

        match command {
            CliCommand::Submit {
                usuario,
                clave,
                parametros,
                no_wait,
                save_to,
            } => {
                let ctx = load_context(base_url, interval_ms)?;
                run_submit(&ctx, usuario, clave, parametros, no_wait, save_to).await?
            }
            CliCommand::Track { id, save_to } => {
                let ctx = load_context(base_url, interval_ms)?;
                run_track(&ctx, &id, save_to).await?
            }
            CliCommand::Fetch {
                link,
                dir,
                kind,
                name,
            } => {
                let ctx = load_context(base_url, interval_ms)?;
                run_fetch(&ctx, &link, dir, kind.into(), &name).await?
            }
            CliCommand::Completions { shell } => {
                run_completions(shell, &mut Cli::command(), &mut std::io::stdout())?
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
