/// Song domain type
use crate::types::SongId;
use serde::{Deserialize, Serialize};

/// A playable song as delivered by the catalog API
///
/// Immutable value; identity is `id`. Two songs with the same id but
/// different metadata still compare unequal under `PartialEq`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Catalog identifier
    pub id: SongId,

    /// Song title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Display-formatted duration (e.g. "3:45")
    pub duration: String,

    /// Playable resource locator handed to the audio engine
    pub file_url: String,
}

impl Song {
    /// Create a song from its catalog fields
    pub fn new(
        id: i64,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration: impl Into<String>,
        file_url: impl Into<String>,
    ) -> Self {
        Self {
            id: SongId::new(id),
            title: title.into(),
            artist: artist.into(),
            duration: duration.into(),
            file_url: file_url.into(),
        }
    }

    /// Whether both values refer to the same catalog song
    pub fn same_song(&self, other: &Song) -> bool {
        self.id == other.id
    }
}
