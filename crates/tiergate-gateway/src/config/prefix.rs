//! Command prefix: validated at config load, replaceable at runtime via `/prefix`.
//!
//! With `bot.prefix_file` set, a changed prefix is written there as
//! `{ "prefix": "..." }` and read back on the next start. A missing, unreadable,
//! or invalid file falls back to the configured prefix.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tiergate_core::error::{Result, TierError};

pub const DEFAULT_PREFIX: &str = "!";

/// Trim and validate a prefix: 1-5 characters, no whitespace.
pub fn normalize_prefix(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) || trimmed.chars().count() > 5 {
        return Err(TierError::BadRequest(
            "invalid prefix; use 1-5 non-whitespace characters".into(),
        ));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Deserialize)]
struct StoredPrefix {
    #[serde(default)]
    prefix: Value,
}

#[derive(Debug, Serialize)]
struct StoredPrefixOut<'a> {
    prefix: &'a str,
}

/// Current prefix, owned by `AppState` (no process-wide global).
#[derive(Debug)]
pub struct PrefixSetting {
    current: RwLock<String>,
    file: Option<PathBuf>,
}

impl PrefixSetting {
    /// In-memory only. Falls back to `DEFAULT_PREFIX` when `initial` is invalid.
    pub fn new(initial: &str) -> Self {
        let value = normalize_prefix(initial).unwrap_or_else(|_| DEFAULT_PREFIX.to_string());
        Self {
            current: RwLock::new(value),
            file: None,
        }
    }

    /// Backed by `file`: a prefix saved there earlier wins over `initial`.
    pub async fn load(initial: &str, file: PathBuf) -> Self {
        let mut setting = Self::new(initial);
        match tokio::fs::read_to_string(&file).await {
            Ok(text) => match read_stored(&text) {
                Some(saved) => {
                    tracing::info!(prefix = %saved, file = %file.display(), "using saved prefix");
                    setting.current = RwLock::new(saved);
                }
                None => tracing::warn!(file = %file.display(), "ignoring invalid prefix file"),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(file = %file.display(), error = %e, "cannot read prefix file"),
        }
        setting.file = Some(file);
        setting
    }

    pub fn get(&self) -> String {
        match self.current.read() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Validate, persist (when file-backed), then switch. A failed write
    /// leaves the current prefix in place.
    pub async fn set(&self, raw: &str) -> Result<String> {
        let value = normalize_prefix(raw)?;
        if let Some(file) = &self.file {
            let body = serde_json::to_string_pretty(&StoredPrefixOut { prefix: &value })
                .map_err(|e| TierError::Internal(format!("encode prefix: {e}")))?;
            tokio::fs::write(file, body)
                .await
                .map_err(|e| TierError::Internal(format!("write {}: {e}", file.display())))?;
        }
        match self.current.write() {
            Ok(mut g) => *g = value.clone(),
            Err(poisoned) => *poisoned.into_inner() = value.clone(),
        }
        Ok(value)
    }
}

fn read_stored(text: &str) -> Option<String> {
    let stored: StoredPrefix = serde_json::from_str(text).ok()?;
    normalize_prefix(stored.prefix.as_str()?).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_short_tokens() {
        assert_eq!(normalize_prefix(" ?? ").unwrap(), "??");
        assert_eq!(normalize_prefix("tg!").unwrap(), "tg!");
        assert_eq!(normalize_prefix("12345").unwrap(), "12345");
    }

    #[test]
    fn rejects_bad_tokens() {
        for bad in ["", "   ", "a b", "123456", "!\t!"] {
            assert!(normalize_prefix(bad).is_err(), "input={bad:?}");
        }
    }

    #[tokio::test]
    async fn setting_updates_and_rejects() {
        let p = PrefixSetting::new("bad prefix");
        assert_eq!(p.get(), DEFAULT_PREFIX);
        assert_eq!(p.set(" $ ").await.unwrap(), "$");
        assert_eq!(p.get(), "$");
        assert!(p.set("toolong").await.is_err());
        assert_eq!(p.get(), "$");
    }

    #[tokio::test]
    async fn saved_prefix_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("prefix.json");

        let p = PrefixSetting::load("!", file.clone()).await;
        assert_eq!(p.get(), "!");
        p.set("tg>").await.unwrap();

        let stored: Value = serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(stored, serde_json::json!({ "prefix": "tg>" }));

        let reloaded = PrefixSetting::load("!", file).await;
        assert_eq!(reloaded.get(), "tg>");
    }

    #[tokio::test]
    async fn invalid_prefix_file_falls_back_to_configured() {
        let dir = tempfile::tempdir().unwrap();
        for body in ["{not json", r#"{"prefix": "way too long"}"#, r#"{"prefix": 5}"#, "{}"] {
            let file = dir.path().join("prefix.json");
            std::fs::write(&file, body).unwrap();
            let p = PrefixSetting::load("?", file).await;
            assert_eq!(p.get(), "?", "body={body}");
        }
    }

    #[tokio::test]
    async fn failed_write_keeps_current_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing-dir").join("prefix.json");
        let p = PrefixSetting::load("!", file).await;
        let err = p.set("$").await.unwrap_err();
        assert_eq!(err.code().as_str(), "INTERNAL");
        assert_eq!(p.get(), "!");
    }
}
