use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::config::TrackerConfig;
use crate::playlist_service::PlaylistService;
use crate::practice::PracticeService;

/// Assembles the app-facing services over one shared repository.
#[derive(Clone)]
pub struct AppServices {
    playlists: Arc<PlaylistService>,
    practice: Arc<PracticeService>,
}

impl AppServices {
    #[must_use]
    pub fn new(clock: Clock, storage: &Storage) -> Self {
        let playlists = Arc::new(PlaylistService::new(Arc::clone(&storage.state)));
        let practice = Arc::new(PracticeService::new(clock, Arc::clone(&storage.state)));
        Self {
            playlists,
            practice,
        }
    }

    /// Build services backed by the JSON file named in `config`.
    #[must_use]
    pub fn from_config(config: &TrackerConfig, clock: Clock) -> Self {
        tracing::debug!(path = %config.data_path.display(), "using json state file");
        Self::new(clock, &Storage::json_file(config.data_path.clone()))
    }

    #[must_use]
    pub fn playlists(&self) -> Arc<PlaylistService> {
        Arc::clone(&self.playlists)
    }

    #[must_use]
    pub fn practice(&self) -> Arc<PracticeService> {
        Arc::clone(&self.practice)
    }
}
