//! CLI command handlers. Each command is in its own file.

mod completions;
mod fetch;
mod follow;
mod submit;
mod track;

pub use completions::run_completions;
pub use fetch::run_fetch;
pub use submit::run_submit;
pub use track::run_track;

use anyhow::Result;
use descargas_core::api::{CurlTaskApi, HttpOptions, SharedTaskApi};
use descargas_core::config::DescargasConfig;
use descargas_core::session::DownloadSession;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// What every backend-facing command needs, built once from the config.
pub struct AppContext {
    pub cfg: DescargasConfig,
    pub options: HttpOptions,
    api: Arc<CurlTaskApi>,
}

impl AppContext {
    pub fn new(cfg: DescargasConfig) -> Result<Self> {
        let options = cfg.http_options();
        let api = Arc::new(CurlTaskApi::new(&cfg.base_url, options.clone())?);
        Ok(Self { cfg, options, api })
    }

    pub fn base_url(&self) -> &Url {
        self.api.base_url()
    }

    pub fn session(&self) -> DownloadSession {
        let api: SharedTaskApi = Arc::clone(&self.api) as SharedTaskApi;
        DownloadSession::new(api, self.cfg.poll_settings())
    }

    /// `--save-to` if given, else `artifact_dir` from config.
    pub fn save_dir(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| self.cfg.artifact_dir.clone())
    }
}
