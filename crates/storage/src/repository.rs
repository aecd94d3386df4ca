use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracker_core::model::TrackerState;

use crate::json::{JsonFileRepository, codec};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the tracker's single state blob.
///
/// Every mutation is a whole-state overwrite: callers load, change, and save
/// within one operation.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Load the full state.
    ///
    /// Never fails: an absent blob yields the default empty state, and a
    /// malformed one is logged and replaced by the default empty state.
    async fn load(&self) -> TrackerState;

    /// Overwrite the stored blob with `state`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the state cannot be encoded or written.
    async fn save(&self, state: &TrackerState) -> Result<(), StorageError>;
}

/// In-memory repository for testing and prototyping.
///
/// Keeps the encoded blob, not the domain value, so it goes through the same
/// codec as the file-backed repository.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    blob: Arc<Mutex<Option<Vec<u8>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a raw stored blob, well-formed or not.
    #[must_use]
    pub fn with_blob(blob: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    /// Current raw blob, if anything was stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn blob(&self) -> Result<Option<Vec<u8>>, StorageError> {
        let guard = self
            .blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl StateRepository for InMemoryRepository {
    async fn load(&self) -> TrackerState {
        match self.blob() {
            Ok(Some(bytes)) => codec::decode_or_default(&bytes, "memory"),
            Ok(None) => TrackerState::default(),
            Err(err) => {
                tracing::warn!(error = %err, "in-memory store unavailable, using empty state");
                TrackerState::default()
            }
        }
    }

    async fn save(&self, state: &TrackerState) -> Result<(), StorageError> {
        let bytes = codec::encode_state(state)?;
        let mut guard = self
            .blob
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(bytes);
        Ok(())
    }
}

/// The state repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub state: Arc<dyn StateRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            state: Arc::new(InMemoryRepository::new()),
        }
    }

    /// Storage backed by a JSON file at `path`. Nothing is touched on disk
    /// until the first save.
    #[must_use]
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self {
            state: Arc::new(JsonFileRepository::new(path)),
        }
    }
}
