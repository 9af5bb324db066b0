//! Bot config loader (strict parsing).

pub mod prefix;
pub mod schema;

use std::fs;

use tiergate_core::error::{Result, TierError};

pub use prefix::{normalize_prefix, PrefixSetting, DEFAULT_PREFIX};
pub use schema::{BotConfig, BotSection, FeatureFlags};

pub fn load_from_file(path: &str) -> Result<BotConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TierError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<BotConfig> {
    let cfg: BotConfig = serde_yaml::from_str(s)
        .map_err(|e| TierError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
