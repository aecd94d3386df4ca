//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use tracker_core::import::ImportError;
use tracker_core::model::{AttemptError, IdError, PlaylistError, QuestionError};

/// Errors emitted by `PlaylistService`.
///
/// Every variant is raised before the stored state is touched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlaylistServiceError {
    #[error("a playlist named {0:?} already exists")]
    DuplicateName(String),
    #[error("playlist not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Playlist(#[from] PlaylistError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by practice sessions and the attempt timer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("playlist not found: {0}")]
    PlaylistNotFound(String),
    #[error("question not found: {0}")]
    QuestionNotFound(String),
    #[error("attempt timer is no longer running")]
    TimerStopped,
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
