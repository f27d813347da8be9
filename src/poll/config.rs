// src/poll/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PATH: &str = "JOBWATCH_CONFIG_PATH";
const DEFAULT_PATH: &str = "config/jobwatch.toml";

/// Everything the pipeline consumes; secrets (webhook URLs) stay in env.
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
    /// Bound on one adapter fetch, seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    /// Per-request bound inside the notification backends, seconds.
    #[serde(default = "default_notify_timeout")]
    pub notify_timeout_secs: u64,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    /// Greenhouse board token, e.g. "stripe". Exactly one of `board`/`url`.
    #[serde(default)]
    pub board: Option<String>,
    /// Full listing-endpoint URL, for boards hosted elsewhere.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    /// Cycles allowed in flight at once for this source. A tick arriving at
    /// the cap is dropped, not queued.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_state_dir() -> String {
    "state".to_string()
}
fn default_fetch_timeout() -> u64 {
    10
}
fn default_notify_timeout() -> u64 {
    10
}
fn default_interval() -> u64 {
    300
}
fn default_max_concurrent() -> usize {
    1
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            fetch_timeout_secs: default_fetch_timeout(),
            notify_timeout_secs: default_notify_timeout(),
            sources: Vec::new(),
        }
    }
}

pub fn load_from(path: &Path) -> Result<PollConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let cfg: PollConfig = toml::from_str(&content)
        .with_context(|| format!("parsing config {}", path.display()))?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Load config using env var + fallbacks:
/// 1) $JOBWATCH_CONFIG_PATH (must exist when set)
/// 2) config/jobwatch.toml
/// 3) built-in defaults (no sources)
pub fn load_default() -> Result<PollConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        }
        return Err(anyhow!("JOBWATCH_CONFIG_PATH points to non-existent path"));
    }
    let default = PathBuf::from(DEFAULT_PATH);
    if default.exists() {
        return load_from(&default);
    }
    Ok(PollConfig::default())
}

fn validate(cfg: &PollConfig) -> Result<()> {
    for s in &cfg.sources {
        if s.board.is_none() && s.url.is_none() {
            return Err(anyhow!("source '{}' needs a `board` or a `url`", s.name));
        }
        if s.interval_secs == 0 {
            return Err(anyhow!("source '{}' has a zero interval", s.name));
        }
        if s.max_concurrent == 0 {
            return Err(anyhow!("source '{}' has max_concurrent = 0", s.name));
        }
    }
    Ok(())
}
