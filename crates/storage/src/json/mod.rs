use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracker_core::model::TrackerState;

use crate::repository::{StateRepository, StorageError};

pub mod codec;
mod mapping;

/// File-backed repository holding the whole state as one JSON document.
///
/// Saves write a sibling temporary file and rename it over the target, so a
/// reader never observes a partially written blob.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "tracker-data.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateRepository for JsonFileRepository {
    async fn load(&self) -> TrackerState {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => codec::decode_or_default(&bytes, &self.path.display().to_string()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no stored state yet");
                TrackerState::default()
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "failed to read stored state, using empty state"
                );
                TrackerState::default()
            }
        }
    }

    async fn save(&self, state: &TrackerState) -> Result<(), StorageError> {
        let bytes = codec::encode_state(state)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "state saved");
        Ok(())
    }
}
