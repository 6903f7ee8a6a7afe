//! Persisted queue subset
//!
//! The playback engine never talks to a storage medium. It hands a
//! `QueueSnapshot` to a `QueuePersistence` after every queue mutation and
//! asks for one when a session is created. Transport and progress fields are
//! not part of the snapshot.

use crate::types::RepeatMode;
use cadence_core::Song;
use serde::{Deserialize, Serialize};

/// Full snapshot of the persisted queue subset
///
/// Field names follow the stored record layout:
/// `{repeatMode, shuffleMode, queue, currentIndex, originalQueue}` with
/// `currentIndex = -1` when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueSnapshot {
    /// Repeat policy
    pub repeat_mode: RepeatMode,

    /// Whether `queue` is a shuffled permutation of `original_queue`
    pub shuffle_mode: bool,

    /// Queue in play order
    pub queue: Vec<Song>,

    /// Current position, -1 when unset
    pub current_index: i64,

    /// Natural order, preserved while shuffled
    pub original_queue: Vec<Song>,
}

impl Default for QueueSnapshot {
    fn default() -> Self {
        Self {
            repeat_mode: RepeatMode::Off,
            shuffle_mode: false,
            queue: Vec::new(),
            current_index: -1,
            original_queue: Vec::new(),
        }
    }
}

/// Storage seam for the queue snapshot
///
/// Implementations own their failure handling: a failed load yields `None`
/// and a failed save is dropped, so the state machine keeps running on its
/// in-memory values.
pub trait QueuePersistence {
    /// Load the last saved snapshot
    fn load(&self) -> Option<QueueSnapshot>;

    /// Save a full snapshot, replacing the previous one
    fn save(&self, snapshot: &QueueSnapshot);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_record() {
        let json = r#"{
            "repeatMode": "all",
            "shuffleMode": false,
            "queue": [{"id":1,"title":"A","artist":"X","duration":"3:00","fileUrl":"a.mp3"}],
            "currentIndex": 0,
            "originalQueue": [{"id":1,"title":"A","artist":"X","duration":"3:00","fileUrl":"a.mp3"}]
        }"#;

        let snapshot: QueueSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.repeat_mode, RepeatMode::All);
        assert!(!snapshot.shuffle_mode);
        assert_eq!(snapshot.queue.len(), 1);
        assert_eq!(snapshot.current_index, 0);
        assert_eq!(snapshot.original_queue, snapshot.queue);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let snapshot: QueueSnapshot = serde_json::from_str(r#"{"repeatMode":"one"}"#).unwrap();
        assert_eq!(snapshot.repeat_mode, RepeatMode::One);
        assert_eq!(snapshot.current_index, -1);
        assert!(snapshot.queue.is_empty());
    }
}
