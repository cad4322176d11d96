use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per source (including the first).
    pub max_attempts: u32,
    /// Linear backoff step in seconds: the n-th retry waits n * this.
    pub base_delay_secs: f64,
    /// Maximum single backoff delay in seconds.
    pub max_delay_secs: u64,
    /// Per-attempt connect and stall timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay_secs: 1.5,
            max_delay_secs: 30,
            timeout_secs: 30,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        if self.max_attempts == 0 {
            bail!("retry.max_attempts must be at least 1");
        }
        if self.timeout_secs == 0 {
            bail!("retry.timeout_secs must be at least 1");
        }
        let base_delay = Duration::try_from_secs_f64(self.base_delay_secs)
            .with_context(|| format!("invalid retry.base_delay_secs: {}", self.base_delay_secs))?;
        Ok(RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay,
            max_delay: Duration::from_secs(self.max_delay_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

/// Remote locations of the Pokémon Showdown data set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowdownConfig {
    /// Client CDN serving compiled `.json` / `.js` data.
    pub cdn_base: String,
    /// Raw-file endpoint of the server repository (without the ref).
    pub github_raw_base: String,
    /// Branch, tag, or commit SHA; pin a SHA for reproducible downloads.
    pub git_ref: String,
}

impl Default for ShowdownConfig {
    fn default() -> Self {
        Self {
            cdn_base: "https://play.pokemonshowdown.com/data".to_string(),
            github_raw_base: "https://raw.githubusercontent.com/smogon/pokemon-showdown"
                .to_string(),
            git_ref: "master".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/psfetch/config.toml`.
/// Missing keys take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Root of the local tree files are written into. Relative paths are
    /// resolved against the working directory.
    pub out_dir: PathBuf,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Optional retry policy; if missing, built-in defaults are used.
    pub retry: Option<RetryConfig>,
    pub showdown: ShowdownConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("data/ps_raw"),
            user_agent: format!("psfetch/{}", env!("CARGO_PKG_VERSION")),
            retry: None,
            showdown: ShowdownConfig::default(),
        }
    }
}

impl FetchConfig {
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        match &self.retry {
            Some(retry) => retry.to_policy(),
            None => Ok(RetryPolicy::default()),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("psfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from the XDG location, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    load_or_init_at(&config_path()?)
}

/// Like `load_or_init`, for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<FetchConfig> {
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(path)
}

/// Load an existing configuration file.
pub fn load_from_path(path: &Path) -> Result<FetchConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
