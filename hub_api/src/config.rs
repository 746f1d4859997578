//! Service configuration: an optional TOML file plus CLI overrides.
//!
//! Every key has a default, so an absent file is the same as an empty one.
//! Spreadsheet credentials are never read from here; they come from the
//! environment on each sheet read.
//!
//! ```toml
//! bind = "0.0.0.0:3000"
//! master_range = "MASTER!A2:U"
//! creatives_range = "CREATIVES!A2:M"
//! request_timeout_secs = 30
//! activity_window_days = 15
//! top_performers_limit = 10
//! ```

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, bail};
use campaign_metrics::{activity::DEFAULT_ACTIVITY_WINDOW_DAYS, aggregate::DEFAULT_TOP_PERFORMERS};
use serde::{Deserialize, Serialize};
use sheet_ingestor::loader::{DEFAULT_CREATIVES_RANGE, DEFAULT_MASTER_RANGE, SheetRanges};
use shared_utils::env::get_optional_env_var;
use toml::from_str;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_PATH_ENV: &str = "PAID_MEDIA_HUB_CONFIG";
/// File picked up from the working directory when nothing else is given.
pub const DEFAULT_CONFIG_FILE: &str = "hub.toml";

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HubConfig {
    /// Listen address.
    pub bind: String,
    pub master_range: String,
    pub creatives_range: String,
    /// Timeout of each outbound HTTP call (token exchange and sheet read).
    pub request_timeout_secs: u64,
    /// Trailing window of the active-campaigns view.
    pub activity_window_days: u32,
    pub top_performers_limit: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            master_range: DEFAULT_MASTER_RANGE.to_string(),
            creatives_range: DEFAULT_CREATIVES_RANGE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            activity_window_days: DEFAULT_ACTIVITY_WINDOW_DAYS,
            top_performers_limit: DEFAULT_TOP_PERFORMERS,
        }
    }
}

impl HubConfig {
    pub fn ranges(&self) -> SheetRanges {
        SheetRanges {
            master: self.master_range.clone(),
            creatives: self.creatives_range.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        self.bind
            .parse()
            .with_context(|| format!("invalid bind address {:?}", self.bind))
    }

    /// Trims string keys and rejects values the service cannot run with.
    pub fn validate(&mut self) -> anyhow::Result<()> {
        self.bind = self.bind.trim().to_string();
        self.master_range = self.master_range.trim().to_string();
        self.creatives_range = self.creatives_range.trim().to_string();

        self.bind_addr()?;
        if self.master_range.is_empty() {
            bail!("master_range cannot be empty");
        }
        if self.creatives_range.is_empty() {
            bail!("creatives_range cannot be empty");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }
        if self.top_performers_limit == 0 {
            bail!("top_performers_limit must be at least 1");
        }
        Ok(())
    }
}

/// Parses and validates a config from TOML text.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<HubConfig> {
    let mut config: HubConfig = from_str(toml_str).context("failed to parse hub config TOML")?;
    config.validate().context("invalid hub config")?;
    Ok(config)
}

/// Reads, parses and validates a config file.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<HubConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}

/// Picks the config file: the CLI flag, then [`CONFIG_PATH_ENV`], then
/// [`DEFAULT_CONFIG_FILE`] if it exists.
pub fn resolve_config_path(cli: Option<PathBuf>) -> Option<PathBuf> {
    cli.or_else(|| get_optional_env_var(CONFIG_PATH_ENV).map(PathBuf::from))
        .or_else(|| {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            fallback.is_file().then_some(fallback)
        })
}

/// Loads the resolved config file, or the defaults when there is none.
pub fn load_config(cli: Option<PathBuf>) -> anyhow::Result<HubConfig> {
    match resolve_config_path(cli) {
        Some(path) => load_config_path(path),
        None => {
            let mut config = HubConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}
