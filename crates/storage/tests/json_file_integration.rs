use std::path::PathBuf;

use storage::repository::{StateRepository, Storage};
use storage::JsonFileRepository;
use tracker_core::model::{
    Attempt, CompletedAttempt, Difficulty, Playlist, PlaylistName, Question, QuestionUrl,
    TrackerState,
};
use tracker_core::time::fixed_now;

fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "tracker-storage-{test}-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn sample_state() -> TrackerState {
    let mut state = TrackerState::default();
    let urls: Vec<QuestionUrl> = ["two-sum", "valid-anagram"]
        .iter()
        .map(|slug| QuestionUrl::new(format!("https://leetcode.com/problems/{slug}/")).unwrap())
        .collect();

    for url in &urls {
        let mut question = Question::new(url.clone(), "Q", Difficulty::Medium, Vec::new()).unwrap();
        question.record_attempt(
            Attempt::new(
                CompletedAttempt {
                    time_think: 45,
                    time_code: 300,
                    saw_solution: false,
                },
                "ok",
                fixed_now(),
            )
            .unwrap(),
        );
        state.questions.insert(url.clone(), question);
    }

    let playlist = Playlist::new(PlaylistName::new("Warmup").unwrap(), urls).unwrap();
    state.playlists.insert(playlist.name().clone(), playlist);
    state
}

#[tokio::test]
async fn missing_file_loads_default_state() {
    let dir = scratch_dir("missing");
    let repo = JsonFileRepository::new(dir.join("state.json"));
    assert!(repo.load().await.is_empty());
    assert!(!repo.path().exists());
}

#[tokio::test]
async fn save_creates_parent_dirs_and_round_trips() {
    let dir = scratch_dir("roundtrip");
    let path = dir.join("nested").join("state.json");
    let storage = Storage::json_file(&path);

    let state = sample_state();
    storage.state.save(&state).await.unwrap();
    assert!(path.exists());
    assert!(!path.with_file_name("state.json.tmp").exists());

    let loaded = storage.state.load().await;
    assert_eq!(loaded, state);

    let first = std::fs::read(&path).unwrap();
    storage.state.save(&loaded).await.unwrap();
    let second = std::fs::read(&path).unwrap();
    assert_eq!(first, second);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn malformed_file_loads_default_state() {
    let dir = scratch_dir("malformed");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("state.json");
    std::fs::write(&path, b"{\"playlists\": oops").unwrap();

    let repo = JsonFileRepository::new(&path);
    assert!(repo.load().await.is_empty());

    // Loading never rewrites the file.
    assert_eq!(std::fs::read(&path).unwrap(), b"{\"playlists\": oops".to_vec());
    let _ = std::fs::remove_dir_all(&dir);
}
