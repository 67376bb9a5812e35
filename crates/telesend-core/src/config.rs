use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Global configuration loaded from `~/.config/telesend/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelesendConfig {
    /// Seconds allowed for the TCP/TLS connect phase of each transfer.
    pub connect_timeout_secs: u64,
    /// Optional whole-transfer limit in seconds (None = curl default, no limit).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// User-Agent sent with every POST (None = no User-Agent header).
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Stack size in bytes for each background transfer thread (None = std default).
    #[serde(default)]
    pub worker_stack_size: Option<usize>,
}

impl Default for TelesendConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: None,
            user_agent: Some(concat!("telesend/", env!("CARGO_PKG_VERSION")).to_string()),
            worker_stack_size: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("telesend")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TelesendConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TelesendConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path (e.g. `--config`). The file must exist.
pub fn load_from(path: &Path) -> Result<TelesendConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: TelesendConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
