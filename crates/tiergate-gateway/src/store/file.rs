//! One pretty-printed JSON file per space: `<dir>/<space id>.json`.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use tiergate_core::{ConfigRecord, Result, TierError};

use super::ConfigStore;

pub struct FileConfigStore {
    dir: PathBuf,
}

impl FileConfigStore {
    /// Open (and create if needed) the config directory.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| TierError::Internal(format!("create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn path_for(&self, space_id: &str) -> Result<PathBuf> {
        let safe = !space_id.is_empty()
            && space_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !safe {
            return Err(TierError::BadRequest(format!("invalid space id: {space_id:?}")));
        }
        Ok(self.dir.join(format!("{space_id}.json")))
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load(&self, space_id: &str) -> Result<ConfigRecord> {
        let path = self.path_for(space_id)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(s) => serde_json::from_str(&s)
                .map_err(|e| TierError::Internal(format!("parse {}: {e}", path.display()))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let record = ConfigRecord::default();
                self.save(space_id, &record).await?;
                tracing::info!(space_id, "created config record");
                Ok(record)
            }
            Err(e) => Err(TierError::Internal(format!("read {}: {e}", path.display()))),
        }
    }

    async fn save(&self, space_id: &str, record: &ConfigRecord) -> Result<()> {
        let path = self.path_for(space_id)?;
        let body = serde_json::to_vec_pretty(record)
            .map_err(|e| TierError::Internal(format!("encode config: {e}")))?;
        let dir = self.dir.clone();

        tokio::task::spawn_blocking(move || write_replace(&dir, &path, &body))
            .await
            .map_err(|e| TierError::Internal(format!("save task failed: {e}")))?
    }
}

/// Write to a fresh temp file in `dir`, then rename it over `path`.
///
/// Each write owns its temp file, so concurrent saves of one space never
/// share a path; the last rename wins and no reader sees a partial file.
fn write_replace(dir: &Path, path: &Path, body: &[u8]) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| TierError::Internal(format!("create temp file in {}: {e}", dir.display())))?;
    tmp.write_all(body)
        .map_err(|e| TierError::Internal(format!("write {}: {e}", tmp.path().display())))?;
    tmp.persist(path)
        .map_err(|e| TierError::Internal(format!("rename {}: {}", path.display(), e.error)))?;
    Ok(())
}
