use std::collections::BTreeMap;

use crate::model::ids::{PlaylistName, QuestionUrl};
use crate::model::playlist::Playlist;
use crate::model::question::Question;

/// Whole application state: every playlist and every question.
///
/// Both maps are ordered by key so the same logical content always
/// serializes to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackerState {
    pub playlists: BTreeMap<PlaylistName, Playlist>,
    pub questions: BTreeMap<QuestionUrl, Question>,
}

impl TrackerState {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty() && self.questions.is_empty()
    }

    #[must_use]
    pub fn playlist(&self, name: &PlaylistName) -> Option<&Playlist> {
        self.playlists.get(name)
    }

    #[must_use]
    pub fn question(&self, url: &QuestionUrl) -> Option<&Question> {
        self.questions.get(url)
    }

    /// Questions of a playlist in playlist order. URLs with no question
    /// record are skipped.
    pub fn playlist_questions<'a>(
        &'a self,
        playlist: &'a Playlist,
    ) -> impl Iterator<Item = &'a Question> + 'a {
        playlist
            .urls()
            .iter()
            .filter_map(|url| self.questions.get(url))
    }

    /// Remove a playlist. Its questions stay in the store.
    pub fn remove_playlist(&mut self, name: &PlaylistName) -> Option<Playlist> {
        self.playlists.remove(name)
    }
}
