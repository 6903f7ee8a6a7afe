/// ID types for Cadence entities
use serde::{Deserialize, Serialize};
use std::fmt;

/// Song identifier, as assigned by the remote catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(i64);

impl SongId {
    /// Create a new song ID
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw catalog id
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for SongId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
