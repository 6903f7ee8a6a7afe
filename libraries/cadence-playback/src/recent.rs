//! Recently played list
//!
//! Bounded, most-recent-first list of selected songs for "recently played"
//! views. Selecting a song that is already listed moves it to the front.

use cadence_core::Song;
use std::collections::VecDeque;

/// Default number of songs kept
pub const DEFAULT_RECENT_CAPACITY: usize = 20;

/// Recently played songs with bounded size
#[derive(Debug, Clone)]
pub struct RecentlyPlayed {
    /// Most recent = front
    songs: VecDeque<Song>,

    /// Maximum list size
    capacity: usize,
}

impl RecentlyPlayed {
    /// Create a list holding at most `capacity` songs
    pub fn new(capacity: usize) -> Self {
        Self {
            songs: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a selection
    ///
    /// If the list is full, the oldest song is discarded.
    pub fn push(&mut self, song: Song) {
        if self.capacity == 0 {
            return;
        }

        if let Some(pos) = self.songs.iter().position(|s| s.id == song.id) {
            self.songs.remove(pos);
        }
        while self.songs.len() >= self.capacity {
            self.songs.pop_back(); // Remove oldest
        }
        self.songs.push_front(song);
    }

    /// Most recently selected song
    pub fn latest(&self) -> Option<&Song> {
        self.songs.front()
    }

    /// Iterate most recent first
    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter()
    }

    /// Get number of songs in the list
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Clear the list
    pub fn clear(&mut self) {
        self.songs.clear();
    }

    /// Get maximum list size
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Set maximum list size
    ///
    /// If the new size is smaller than the current length, oldest entries
    /// are discarded.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.songs.truncate(capacity);
    }
}

impl Default for RecentlyPlayed {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_song(id: i64) -> Song {
        Song::new(
            id,
            format!("Song {}", id),
            "Test Artist",
            "3:00",
            format!("https://cdn.example/{}.mp3", id),
        )
    }

    fn ids(recent: &RecentlyPlayed) -> Vec<i64> {
        recent.iter().map(|s| s.id.get()).collect()
    }

    #[test]
    fn default_capacity() {
        let recent = RecentlyPlayed::default();
        assert_eq!(recent.capacity(), 20);
        assert!(recent.is_empty());
    }

    #[test]
    fn most_recent_first() {
        let mut recent = RecentlyPlayed::new(10);
        recent.push(create_test_song(1));
        recent.push(create_test_song(2));
        recent.push(create_test_song(3));

        assert_eq!(ids(&recent), vec![3, 2, 1]);
        assert_eq!(recent.latest().unwrap().id.get(), 3);
    }

    #[test]
    fn replay_moves_to_front() {
        let mut recent = RecentlyPlayed::new(10);
        recent.push(create_test_song(1));
        recent.push(create_test_song(2));
        recent.push(create_test_song(1));

        assert_eq!(ids(&recent), vec![1, 2]);
    }

    #[test]
    fn bounded() {
        let mut recent = RecentlyPlayed::new(3);
        for id in 1..=4 {
            recent.push(create_test_song(id));
        }

        // Song 1 fell off
        assert_eq!(ids(&recent), vec![4, 3, 2]);
    }

    #[test]
    fn shrink_capacity() {
        let mut recent = RecentlyPlayed::new(5);
        for id in 1..=5 {
            recent.push(create_test_song(id));
        }

        recent.set_capacity(2);
        assert_eq!(ids(&recent), vec![5, 4]);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut recent = RecentlyPlayed::new(0);
        recent.push(create_test_song(1));
        assert!(recent.is_empty());
    }

    #[test]
    fn clear() {
        let mut recent = RecentlyPlayed::new(5);
        recent.push(create_test_song(1));
        recent.clear();
        assert_eq!(recent.len(), 0);
    }
}
