use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{PlaylistName, QuestionUrl};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlaylistError {
    #[error("playlist needs at least one question url")]
    NoQuestions,
}

//
// ─── SPEEDRUN ──────────────────────────────────────────────────────────────────
//

/// Timing of one full run through a completed playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedrunRun {
    pub total_time: u32,
    pub date: DateTime<Utc>,
}

//
// ─── PLAYLIST ──────────────────────────────────────────────────────────────────
//

/// Named, ordered list of question references.
///
/// A playlist owns only its URLs; the questions themselves live in the
/// tracker state and may be shared between playlists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    name: PlaylistName,
    urls: Vec<QuestionUrl>,
    speedrun_history: Vec<SpeedrunRun>,
}

impl Playlist {
    /// Creates a playlist over the given URLs, in order.
    ///
    /// # Errors
    ///
    /// Returns `PlaylistError::NoQuestions` if `urls` is empty.
    pub fn new(name: PlaylistName, urls: Vec<QuestionUrl>) -> Result<Self, PlaylistError> {
        if urls.is_empty() {
            return Err(PlaylistError::NoQuestions);
        }
        Ok(Self {
            name,
            urls,
            speedrun_history: Vec::new(),
        })
    }

    /// Rehydrate a playlist from storage. An empty URL list is tolerated here.
    #[must_use]
    pub fn from_persisted(
        name: PlaylistName,
        urls: Vec<QuestionUrl>,
        speedrun_history: Vec<SpeedrunRun>,
    ) -> Self {
        Self {
            name,
            urls,
            speedrun_history,
        }
    }

    #[must_use]
    pub fn name(&self) -> &PlaylistName {
        &self.name
    }

    #[must_use]
    pub fn urls(&self) -> &[QuestionUrl] {
        &self.urls
    }

    #[must_use]
    pub fn speedrun_history(&self) -> &[SpeedrunRun] {
        &self.speedrun_history
    }

    /// Fastest recorded speedrun, in seconds.
    #[must_use]
    pub fn best_speedrun(&self) -> Option<u32> {
        self.speedrun_history.iter().map(|run| run.total_time).min()
    }
}
