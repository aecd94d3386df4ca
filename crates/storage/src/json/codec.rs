//! Encoding of the whole tracker state as one compact JSON blob.

use tracker_core::model::TrackerState;

use super::mapping::StateRecord;
use crate::repository::StorageError;

/// Encode the full state. Equal states always produce identical bytes.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_state(state: &TrackerState) -> Result<Vec<u8>, StorageError> {
    serde_json::to_vec(&StateRecord::from_state(state))
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Decode a stored blob.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the blob is not valid JSON of the
/// expected shape or holds invalid values.
pub fn decode_state(bytes: &[u8]) -> Result<TrackerState, StorageError> {
    let record: StateRecord =
        serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))?;
    record.into_state()
}

/// Decode a blob, substituting the default empty state when it is malformed.
pub(crate) fn decode_or_default(bytes: &[u8], source: &str) -> TrackerState {
    match decode_state(bytes) {
        Ok(state) => state,
        Err(err) => {
            tracing::warn!(source, error = %err, "stored state is malformed, using empty state");
            TrackerState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_BLOB: &str = r#"{"playlists":{"Blind 75":{"urls":["https://leetcode.com/problems/two-sum/","https://leetcode.com/problems/missing/"],"speedrunHistory":[{"totalTime":900,"date":"2024-03-05T09:30:00.000Z"}]}},"questions":{"https://leetcode.com/problems/two-sum/":{"url":"https://leetcode.com/problems/two-sum/","title":"Two Sum","difficulty":"Easy","topics":["Array","Hash Table"],"totalAttempts":2,"unaidedAttempts":1,"completionStatus":"In Progress","history":[{"date":"2024-03-01T10:00:00.000Z","timeThink":120,"timeCode":0,"sawSolution":true,"totalTime":120,"remarks":"forgot the trick"},{"date":"2024-03-02T10:00:00.250Z","timeThink":60,"timeCode":200,"sawSolution":false,"totalTime":260,"remarks":""}]}}}"#;

    #[test]
    fn legacy_blob_re_encodes_byte_for_byte() {
        let state = decode_state(LEGACY_BLOB.as_bytes()).unwrap();
        let encoded = encode_state(&state).unwrap();
        assert_eq!(String::from_utf8(encoded).unwrap(), LEGACY_BLOB);
    }

    #[test]
    fn save_of_load_is_stable() {
        let state = decode_state(LEGACY_BLOB.as_bytes()).unwrap();
        let first = encode_state(&state).unwrap();
        let second = encode_state(&decode_state(&first).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn dates_are_written_with_milliseconds() {
        let blob = LEGACY_BLOB.replace("2024-03-01T10:00:00.000Z", "2024-03-01T10:00:00Z");
        let state = decode_state(blob.as_bytes()).unwrap();
        let encoded = String::from_utf8(encode_state(&state).unwrap()).unwrap();
        assert_eq!(encoded, LEGACY_BLOB);
    }

    #[test]
    fn blank_playlist_urls_are_skipped() {
        let two_sum = "\"https://leetcode.com/problems/two-sum/\"";
        for gap in ["\"\"", "null", "\"   \""] {
            let blob = LEGACY_BLOB.replace(
                &format!("\"urls\":[{two_sum},"),
                &format!("\"urls\":[{two_sum},{gap},"),
            );
            assert_ne!(blob, LEGACY_BLOB);

            let state = decode_state(blob.as_bytes()).unwrap();
            let playlist = state.playlists.values().next().unwrap();
            assert_eq!(playlist.urls().len(), 2);

            let question = state.questions.values().next().unwrap();
            assert_eq!(question.history().len(), 2);
            assert_eq!(
                String::from_utf8(encode_state(&state).unwrap()).unwrap(),
                LEGACY_BLOB
            );
        }
    }

    #[test]
    fn counters_are_derived_not_trusted() {
        let blob = LEGACY_BLOB
            .replace("\"totalAttempts\":2", "\"totalAttempts\":9")
            .replace("\"In Progress\"", "\"Completed\"");
        let state = decode_state(blob.as_bytes()).unwrap();
        let question = state.questions.values().next().unwrap();
        assert_eq!(question.total_attempts(), 2);
        assert_eq!(question.unaided_attempts(), 1);
        assert!(!question.completion_status().is_completed());
    }

    #[test]
    fn empty_object_is_the_default_state() {
        assert!(decode_state(b"{}").unwrap().is_empty());
        assert_eq!(
            encode_state(&TrackerState::default()).unwrap(),
            br#"{"playlists":{},"questions":{}}"#.to_vec()
        );
    }

    #[test]
    fn out_of_range_timings_are_malformed() {
        let blob = LEGACY_BLOB.replace("\"timeThink\":120", "\"timeThink\":1200");
        assert!(decode_state(blob.as_bytes()).is_err());
        assert!(decode_or_default(blob.as_bytes(), "test").is_empty());
    }

    #[test]
    fn wrong_shape_is_malformed() {
        assert!(decode_state(b"\"text\"").is_err());
        assert!(decode_state(br#"{"playlists":{"x":{"urls":5}}}"#).is_err());
    }
}
