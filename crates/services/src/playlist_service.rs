use std::sync::Arc;

use storage::repository::StateRepository;
use tracker_core::import::{ImportRecord, QuestionImport};
use tracker_core::model::{Playlist, PlaylistError, PlaylistName, Question, TrackerState};
use tracker_core::stats::{OverallStats, PlaylistDetails, PlaylistProgress};

use crate::error::PlaylistServiceError;

/// Orchestrates playlist creation, deletion and progress reporting.
#[derive(Clone)]
pub struct PlaylistService {
    state: Arc<dyn StateRepository>,
}

impl PlaylistService {
    #[must_use]
    pub fn new(state: Arc<dyn StateRepository>) -> Self {
        Self { state }
    }

    /// Create a playlist from imported records and persist it.
    ///
    /// Each record upserts its question: title, difficulty and topics are
    /// replaced, while the history of an already tracked question is kept.
    /// Records with a blank URL are dropped.
    ///
    /// # Errors
    ///
    /// Returns `PlaylistServiceError::Id` for a blank name,
    /// `PlaylistServiceError::Playlist` when no usable URL remains,
    /// `PlaylistServiceError::DuplicateName` if the name is taken, and
    /// `PlaylistServiceError::Storage` if persistence fails. Nothing is
    /// saved in any of these cases.
    pub async fn create_playlist(
        &self,
        name: &str,
        records: Vec<ImportRecord>,
    ) -> Result<PlaylistName, PlaylistServiceError> {
        let name = PlaylistName::new(name)?;
        let imports = records
            .into_iter()
            .filter(|record| !record.url.trim().is_empty())
            .map(ImportRecord::normalize)
            .collect::<Result<Vec<_>, _>>()?;
        if imports.is_empty() {
            return Err(PlaylistError::NoQuestions.into());
        }

        let mut state = self.state.load().await;
        if state.playlists.contains_key(&name) {
            return Err(PlaylistServiceError::DuplicateName(name.to_string()));
        }

        let mut urls = Vec::with_capacity(imports.len());
        for import in imports {
            urls.push(import.url.clone());
            upsert_question(&mut state, import)?;
        }
        let playlist = Playlist::new(name.clone(), urls)?;
        let size = playlist.urls().len();
        state.playlists.insert(name.clone(), playlist);

        self.state.save(&state).await?;
        tracing::info!(playlist = %name, questions = size, "playlist created");
        Ok(name)
    }

    /// Delete a playlist. Its questions stay tracked, since other playlists
    /// may reference them.
    ///
    /// # Errors
    ///
    /// Returns `PlaylistServiceError::NotFound` if no such playlist exists, or
    /// `PlaylistServiceError::Storage` if persistence fails.
    pub async fn delete_playlist(&self, name: &str) -> Result<(), PlaylistServiceError> {
        let name = PlaylistName::new(name)?;
        let mut state = self.state.load().await;
        if state.remove_playlist(&name).is_none() {
            return Err(PlaylistServiceError::NotFound(name.to_string()));
        }
        self.state.save(&state).await?;
        tracing::info!(playlist = %name, "playlist deleted");
        Ok(())
    }

    /// Completion progress of every playlist, ordered by name.
    pub async fn list_playlists(&self) -> Vec<PlaylistProgress> {
        let state = self.state.load().await;
        state
            .playlists
            .values()
            .map(|playlist| PlaylistProgress::for_playlist(playlist, &state))
            .collect()
    }

    /// Progress of a single playlist.
    ///
    /// # Errors
    ///
    /// Returns `PlaylistServiceError::NotFound` if no such playlist exists.
    pub async fn playlist_progress(
        &self,
        name: &str,
    ) -> Result<PlaylistProgress, PlaylistServiceError> {
        let name = PlaylistName::new(name)?;
        let state = self.state.load().await;
        let playlist = state
            .playlist(&name)
            .ok_or_else(|| PlaylistServiceError::NotFound(name.to_string()))?;
        Ok(PlaylistProgress::for_playlist(playlist, &state))
    }

    /// Per-question table for one playlist.
    ///
    /// # Errors
    ///
    /// Returns `PlaylistServiceError::NotFound` if no such playlist exists.
    pub async fn playlist_details(
        &self,
        name: &str,
    ) -> Result<PlaylistDetails, PlaylistServiceError> {
        let name = PlaylistName::new(name)?;
        let state = self.state.load().await;
        let playlist = state
            .playlist(&name)
            .ok_or_else(|| PlaylistServiceError::NotFound(name.to_string()))?;
        Ok(PlaylistDetails::for_playlist(playlist, &state))
    }

    pub async fn overall_stats(&self) -> OverallStats {
        OverallStats::from_state(&self.state.load().await)
    }
}

fn upsert_question(
    state: &mut TrackerState,
    import: QuestionImport,
) -> Result<(), PlaylistServiceError> {
    if let Some(raw) = &import.rejected_difficulty {
        tracing::warn!(url = %import.url, difficulty = %raw, "unknown difficulty, using N/A");
    }

    if let Some(existing) = state.questions.get_mut(&import.url) {
        existing.update_metadata(import.title, import.difficulty, import.topics)?;
    } else {
        let question =
            Question::new(import.url.clone(), import.title, import.difficulty, import.topics)?;
        state.questions.insert(import.url, question);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use storage::repository::InMemoryRepository;
    use tracker_core::model::{Difficulty, QuestionUrl};

    fn service() -> (PlaylistService, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        (PlaylistService::new(Arc::new(repo.clone())), repo)
    }

    #[tokio::test]
    async fn create_applies_import_defaults() {
        let (service, repo) = service();
        let records = vec![
            ImportRecord::from_url("https://leetcode.com/problems/two-sum/"),
            ImportRecord {
                url: "https://leetcode.com/problems/3sum/".into(),
                title: Some("3Sum".into()),
                difficulty: Some("Medium".into()),
                topics: Some("Array, Two Pointers".into()),
            },
        ];

        let name = service.create_playlist("  Arrays ", records).await.unwrap();
        assert_eq!(name.as_str(), "Arrays");

        let state = repo.load().await;
        let two_sum = state
            .question(&QuestionUrl::new("https://leetcode.com/problems/two-sum/").unwrap())
            .unwrap();
        assert_eq!(two_sum.title(), "Two Sum");
        assert_eq!(two_sum.difficulty(), Difficulty::NotAvailable);

        let three_sum = state
            .question(&QuestionUrl::new("https://leetcode.com/problems/3sum/").unwrap())
            .unwrap();
        assert_eq!(three_sum.topics(), ["Array", "Two Pointers"]);
        assert_eq!(state.playlist(&name).unwrap().urls().len(), 2);
    }

    #[tokio::test]
    async fn invalid_requests_do_not_touch_storage() {
        let (service, repo) = service();

        let err = service
            .create_playlist("   ", vec![ImportRecord::from_url("https://x/problems/a/")])
            .await
            .unwrap_err();
        assert!(matches!(err, PlaylistServiceError::Id(_)));

        let err = service
            .create_playlist("Empty", vec![ImportRecord::from_url("  ")])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlaylistServiceError::Playlist(PlaylistError::NoQuestions)
        ));

        assert!(repo.blob().unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected() {
        let (service, repo) = service();
        service
            .create_playlist("Dupes", vec![ImportRecord::from_url("https://x/problems/a/")])
            .await
            .unwrap();
        let before = repo.blob().unwrap();

        let err = service
            .create_playlist("Dupes", vec![ImportRecord::from_url("https://x/problems/b/")])
            .await
            .unwrap_err();
        assert!(matches!(err, PlaylistServiceError::DuplicateName(_)));
        assert_eq!(repo.blob().unwrap(), before);
    }

    #[tokio::test]
    async fn delete_unknown_playlist_is_not_found() {
        let (service, _repo) = service();
        let err = service.delete_playlist("Nope").await.unwrap_err();
        assert!(matches!(err, PlaylistServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_reports_progress_per_playlist() {
        let (service, _repo) = service();
        service
            .create_playlist("B", vec![ImportRecord::from_url("https://x/problems/a/")])
            .await
            .unwrap();
        service
            .create_playlist("A", vec![ImportRecord::from_url("https://x/problems/b/")])
            .await
            .unwrap();

        let listed = service.list_playlists().await;
        let names: Vec<_> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(listed.iter().all(|p| p.completion_percent == 0));

        let stats = service.overall_stats().await;
        assert_eq!(stats.total_questions, 2);
        assert_eq!(stats.total_attempts, 0);
    }
}
