/// Listening history event
use crate::types::SongId;
use serde::{Deserialize, Serialize};

/// A single play of a song, reported to the listening history service
///
/// `duration` and `position` are in seconds. `position` is how far playback
/// got before the song finished or was replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayEvent {
    /// Song that was played
    pub song_id: SongId,

    /// Total song duration as reported by the decoder
    pub duration: f64,

    /// Furthest position reached
    pub position: f64,
}

impl PlayEvent {
    /// Create a play event
    pub fn new(song_id: SongId, duration: f64, position: f64) -> Self {
        Self {
            song_id,
            duration,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        let event = PlayEvent::new(SongId::new(3), 200.0, 61.5);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["songId"], 3);
        assert_eq!(json["duration"], 200.0);
        assert_eq!(json["position"], 61.5);
    }
}
