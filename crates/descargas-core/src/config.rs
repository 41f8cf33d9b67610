use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::HttpOptions;
use crate::poller::PollSettings;
use crate::status::TerminalStatuses;

/// Default poll cadence in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Global configuration loaded from `~/.config/descargas/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescargasConfig {
    /// Backend base URL; `descargas` and `tareas/{id}` are resolved against it.
    pub base_url: String,
    /// Fixed interval between status requests.
    pub poll_interval_ms: u64,
    /// Status values that end polling.
    pub terminal_statuses: Vec<String>,
    /// Optional bearer token sent as `Authorization` on every request.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Connect timeout in seconds (None = libcurl default).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Whole-request timeout in seconds (None = no client-side timeout).
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// When set, artifacts of completed tasks are saved here unless `--save-to` overrides it.
    #[serde(default)]
    pub artifact_dir: Option<PathBuf>,
}

impl Default for DescargasConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/".to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            terminal_statuses: TerminalStatuses::default().into_vec(),
            api_token: None,
            connect_timeout_secs: None,
            request_timeout_secs: None,
            artifact_dir: None,
        }
    }
}

impl DescargasConfig {
    /// Reject values the poller and HTTP layer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than zero");
        }
        if self.terminal_statuses.is_empty() {
            anyhow::bail!("terminal_statuses must name at least one status");
        }
        url::Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url: {}", self.base_url))?;
        Ok(())
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings::new(
            Duration::from_millis(self.poll_interval_ms),
            TerminalStatuses::new(self.terminal_statuses.iter().cloned()),
        )
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            api_token: self.api_token.clone(),
            connect_timeout: self.connect_timeout(),
            request_timeout: self.request_timeout(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("descargas")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DescargasConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<DescargasConfig> {
    if !path.exists() {
        let default_cfg = DescargasConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let cfg: DescargasConfig =
        toml::from_str(&data).with_context(|| format!("invalid config: {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
