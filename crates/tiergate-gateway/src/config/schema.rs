use serde::Deserialize;
use tiergate_core::error::{Result, TierError};

use super::prefix::{normalize_prefix, DEFAULT_PREFIX};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    pub version: u32,

    #[serde(default)]
    pub bot: BotSection,

    #[serde(default)]
    pub features: FeatureFlags,
}

impl BotConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TierError::UnsupportedVersion);
        }
        self.bot.validate()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BotSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Directory holding one `<space id>.json` record per space.
    #[serde(default = "default_config_dir")]
    pub config_dir: String,

    /// Lifetime of temporary replies.
    #[serde(default = "default_response_time_ms")]
    pub response_time_ms: u64,

    #[serde(default)]
    pub help_link: String,

    /// Where a `/prefix` change is saved; unset keeps it in memory only.
    #[serde(default)]
    pub prefix_file: Option<String>,
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            prefix: default_prefix(),
            config_dir: default_config_dir(),
            response_time_ms: default_response_time_ms(),
            help_link: String::new(),
            prefix_file: None,
        }
    }
}

impl BotSection {
    pub fn validate(&self) -> Result<()> {
        normalize_prefix(&self.prefix)
            .map_err(|e| TierError::BadRequest(format!("bot.prefix: {e}")))?;
        if !(500..=60000).contains(&self.response_time_ms) {
            return Err(TierError::BadRequest(
                "bot.response_time_ms must be between 500 and 60000".into(),
            ));
        }
        if self.prefix_file.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(TierError::BadRequest("bot.prefix_file must not be empty".into()));
        }
        if self.config_dir.trim().is_empty() {
            return Err(TierError::BadRequest("bot.config_dir must not be empty".into()));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_prefix() -> String {
    DEFAULT_PREFIX.into()
}
fn default_config_dir() -> String {
    "configs".into()
}
fn default_response_time_ms() -> u64 {
    4000
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FeatureFlags {
    /// Exposes `/prefix`; off outside development.
    #[serde(default)]
    pub enable_prefix_command: bool,
}
