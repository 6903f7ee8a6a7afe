//! Playback session - composition root for the state machine
//!
//! Ties the playback state, the queue, the recently played list and an
//! optional persistence backend together:
//!
//! - every queue mutation is followed by a full snapshot save
//! - every song selected through the session becomes the current song, is
//!   marked playing and is pushed to the recently played list
//!
//! The audio adapter works on [`Session::state_mut`] directly; the session
//! never talks to the decoder.

use crate::events::{PlaybackEvent, SubscriptionId};
use crate::queue::Queue;
use crate::recent::RecentlyPlayed;
use crate::snapshot::QueuePersistence;
use crate::state::PlaybackState;
use crate::types::{PlaybackConfig, RepeatMode};
use cadence_core::Song;
use rand::Rng;
use std::fmt;
use tracing::{debug, info};

/// Playback session
pub struct Session {
    state: PlaybackState,
    queue: Queue,
    recent: RecentlyPlayed,
    persistence: Option<Box<dyn QueuePersistence>>,
}

impl Session {
    /// Create a session without persistence
    pub fn new(config: PlaybackConfig) -> Self {
        let mut state = PlaybackState::new();
        state.set_volume(config.volume);

        let mut queue = Queue::new();
        queue.set_repeat_mode(config.repeat);

        Self {
            state,
            queue,
            recent: RecentlyPlayed::new(config.recent_capacity),
            persistence: None,
        }
    }

    /// Create a session backed by `persistence`, restoring the saved queue
    ///
    /// Only the queue subset is restored. Transport flags keep their
    /// defaults and no song is selected until the user navigates.
    pub fn with_persistence(config: PlaybackConfig, persistence: Box<dyn QueuePersistence>) -> Self {
        let mut session = Self::new(config);

        if let Some(snapshot) = persistence.load() {
            session.queue = Queue::from_snapshot(snapshot);
            info!(
                length = session.queue.len(),
                current_index = ?session.queue.current_index(),
                repeat = %session.queue.repeat_mode(),
                shuffled = session.queue.is_shuffled(),
                "Restored queue"
            );
        }

        session.persistence = Some(persistence);
        session
    }

    // ===== Components =====

    /// Playback state
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Mutable playback state, for the audio adapter and transport controls
    pub fn state_mut(&mut self) -> &mut PlaybackState {
        &mut self.state
    }

    /// Queue (read-only; mutate through the session so changes persist)
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Recently played songs
    pub fn recent(&self) -> &RecentlyPlayed {
        &self.recent
    }

    /// Register a queue change listener
    pub fn subscribe_queue<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PlaybackEvent) + 'static,
    {
        self.queue.subscribe(listener)
    }

    /// Remove a queue change listener
    pub fn unsubscribe_queue(&mut self, id: SubscriptionId) -> bool {
        self.queue.unsubscribe(id)
    }

    // ===== Queue Operations =====

    /// Replace the queue and start playing at `start_index`
    pub fn set_queue(&mut self, songs: Vec<Song>, start_index: usize) -> Option<Song> {
        let current = self.queue.set_queue(songs, start_index);
        self.persist();
        self.select(current.clone());
        current
    }

    /// Append a song; the current selection is untouched
    pub fn add_to_queue(&mut self, song: Song) {
        self.queue.add_to_queue(song);
        self.persist();
    }

    /// Remove the entry at `index`
    ///
    /// Removing the current entry hands over to the song now at the current
    /// index without changing the transport flag. Removing the last
    /// remaining song stops playback.
    pub fn remove_from_queue(&mut self, index: usize) -> Option<Song> {
        let was_current = self.queue.current_index() == Some(index);
        let removed = self.queue.remove_from_queue(index)?;
        self.persist();

        if was_current {
            match self.queue.current_song().cloned() {
                Some(next) => {
                    debug!(song_id = %next.id, "Current entry removed, handing over");
                    self.recent.push(next.clone());
                    self.state.set_current_song(Some(next));
                }
                None => {
                    self.state.set_current_song(None);
                    self.state.set_is_playing(false);
                }
            }
        }

        Some(removed)
    }

    /// Remove everything and stop
    pub fn clear_queue(&mut self) {
        self.queue.clear_queue();
        self.persist();
        self.state.set_current_song(None);
        self.state.set_is_playing(false);
    }

    /// Advance and play the next song
    ///
    /// Returns `None` (leaving playback untouched) when there is no next
    /// song under the current repeat mode.
    pub fn play_next(&mut self) -> Option<Song> {
        let song = self.queue.play_next()?;
        self.persist();
        self.select(Some(song.clone()));
        Some(song)
    }

    /// Step back and play the previous song
    pub fn play_previous(&mut self) -> Option<Song> {
        let song = self.queue.play_previous()?;
        self.persist();
        self.select(Some(song.clone()));
        Some(song)
    }

    /// Auto-advance after the current song finished
    ///
    /// Call when the audio adapter reports end-of-media. Under repeat one the
    /// same entry is selected again, which reloads it from the start. At the
    /// end of the queue with repeat off playback simply stays stopped.
    pub fn advance_after_finish(&mut self) -> Option<Song> {
        let next = self.play_next();
        if next.is_none() {
            debug!("Reached end of queue");
        }
        next
    }

    /// Set repeat mode
    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.queue.set_repeat_mode(mode);
        self.persist();
    }

    /// Toggle shuffle, returning the new shuffle state
    pub fn toggle_shuffle(&mut self) -> bool {
        self.toggle_shuffle_with(&mut rand::thread_rng())
    }

    /// Toggle shuffle with an explicit RNG
    pub fn toggle_shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let enabled = self.queue.toggle_shuffle_with(rng);
        self.persist();
        enabled
    }

    // ===== Internals =====

    fn select(&mut self, song: Option<Song>) {
        match song {
            Some(song) => {
                self.recent.push(song.clone());
                self.state.set_current_song(Some(song));
                self.state.set_is_playing(true);
            }
            None => {
                self.state.set_current_song(None);
                self.state.set_is_playing(false);
            }
        }
    }

    fn persist(&self) {
        if let Some(persistence) = &self.persistence {
            persistence.save(&self.queue.snapshot());
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("queue", &self.queue)
            .field("recent", &self.recent)
            .field("persistent", &self.persistence.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::QueueSnapshot;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct SharedPersistence {
        saved: Rc<RefCell<Option<QueueSnapshot>>>,
        saves: Rc<RefCell<usize>>,
    }

    impl QueuePersistence for SharedPersistence {
        fn load(&self) -> Option<QueueSnapshot> {
            self.saved.borrow().clone()
        }

        fn save(&self, snapshot: &QueueSnapshot) {
            *self.saved.borrow_mut() = Some(snapshot.clone());
            *self.saves.borrow_mut() += 1;
        }
    }

    fn create_test_song(id: i64) -> Song {
        Song::new(
            id,
            format!("Song {}", id),
            "Test Artist",
            "3:00",
            format!("https://cdn.example/{}.mp3", id),
        )
    }

    fn songs(n: i64) -> Vec<Song> {
        (1..=n).map(create_test_song).collect()
    }

    #[test]
    fn new_session_applies_config() {
        let session = Session::new(PlaybackConfig {
            recent_capacity: 5,
            repeat: RepeatMode::All,
            volume: 0.5,
        });

        assert_eq!(session.queue().repeat_mode(), RepeatMode::All);
        assert_eq!(session.state().volume(), 0.5);
        assert_eq!(session.recent().capacity(), 5);
    }

    #[test]
    fn set_queue_selects_and_plays() {
        let mut session = Session::default();
        let current = session.set_queue(songs(3), 1).unwrap();

        assert_eq!(current.id.get(), 2);
        assert_eq!(session.state().current_song(), Some(&current));
        assert!(session.state().is_playing());
        assert!(session.state().is_loading());
        assert_eq!(session.recent().latest(), Some(&current));
    }

    #[test]
    fn set_queue_out_of_range_selects_nothing() {
        let mut session = Session::default();
        assert!(session.set_queue(songs(2), 5).is_none());
        assert!(session.state().current_song().is_none());
        assert!(!session.state().is_playing());
    }

    #[test]
    fn next_at_end_leaves_playback_alone() {
        let mut session = Session::default();
        session.set_queue(songs(2), 1);
        let generation = session.state().generation();

        assert!(session.play_next().is_none());
        assert_eq!(session.state().generation(), generation);
        assert_eq!(session.state().current_song().unwrap().id.get(), 2);
    }

    #[test]
    fn advance_after_finish_under_repeat_one_reloads() {
        let mut session = Session::default();
        session.set_repeat_mode(RepeatMode::One);
        session.set_queue(songs(3), 0);
        session.state_mut().set_is_playing(false);
        let generation = session.state().generation();

        let song = session.advance_after_finish().unwrap();
        assert_eq!(song.id.get(), 1);
        assert!(session.state().generation() > generation);
        assert!(session.state().is_playing());
    }

    #[test]
    fn removing_current_hands_over_without_touching_transport() {
        let mut session = Session::default();
        session.set_queue(songs(3), 1);
        session.state_mut().set_is_playing(false);

        session.remove_from_queue(1);
        assert_eq!(session.state().current_song().unwrap().id.get(), 3);
        assert!(!session.state().is_playing());
    }

    #[test]
    fn removing_other_entry_keeps_selection() {
        let mut session = Session::default();
        session.set_queue(songs(3), 1);
        let generation = session.state().generation();

        session.remove_from_queue(0);
        assert_eq!(session.state().generation(), generation);
        assert_eq!(session.queue().current_index(), Some(0));
    }

    #[test]
    fn removing_last_song_stops() {
        let mut session = Session::default();
        session.set_queue(songs(1), 0);

        session.remove_from_queue(0);
        assert!(session.state().current_song().is_none());
        assert!(!session.state().is_playing());
    }

    #[test]
    fn clear_queue_stops() {
        let mut session = Session::default();
        session.set_queue(songs(3), 0);

        session.clear_queue();
        assert!(session.queue().is_empty());
        assert!(session.state().current_song().is_none());
        assert!(!session.state().is_playing());
    }

    #[test]
    fn every_queue_mutation_persists() {
        let persistence = SharedPersistence::default();
        let mut session =
            Session::with_persistence(PlaybackConfig::default(), Box::new(persistence.clone()));

        session.set_queue(songs(3), 0);
        session.add_to_queue(create_test_song(4));
        session.play_next();
        session.set_repeat_mode(RepeatMode::All);
        session.toggle_shuffle();
        session.remove_from_queue(0);
        session.clear_queue();

        assert_eq!(*persistence.saves.borrow(), 7);
        let saved = persistence.saved.borrow().clone().unwrap();
        assert!(saved.queue.is_empty());
        assert_eq!(saved.current_index, -1);
        assert_eq!(saved.repeat_mode, RepeatMode::All);
    }

    #[test]
    fn failed_navigation_does_not_persist() {
        let persistence = SharedPersistence::default();
        let mut session =
            Session::with_persistence(PlaybackConfig::default(), Box::new(persistence.clone()));

        session.play_next();
        session.play_previous();
        session.remove_from_queue(3);

        assert_eq!(*persistence.saves.borrow(), 0);
    }

    #[test]
    fn restore_leaves_transport_default() {
        let persistence = SharedPersistence::default();
        {
            let mut session = Session::with_persistence(
                PlaybackConfig::default(),
                Box::new(persistence.clone()),
            );
            session.set_queue(songs(3), 2);
            session.set_repeat_mode(RepeatMode::All);
        }

        let session =
            Session::with_persistence(PlaybackConfig::default(), Box::new(persistence.clone()));

        assert_eq!(session.queue().len(), 3);
        assert_eq!(session.queue().current_index(), Some(2));
        assert_eq!(session.queue().repeat_mode(), RepeatMode::All);
        assert!(session.state().current_song().is_none());
        assert!(!session.state().is_playing());
        assert!(session.recent().is_empty());
    }

    #[test]
    fn queue_listener_through_session() {
        let seen = Rc::new(RefCell::new(0));
        let mut session = Session::default();
        let counter = Rc::clone(&seen);
        let id = session.subscribe_queue(move |_| *counter.borrow_mut() += 1);

        session.set_queue(songs(2), 0);
        assert_eq!(*seen.borrow(), 1);

        assert!(session.unsubscribe_queue(id));
        session.play_next();
        assert_eq!(*seen.borrow(), 1);
    }
}
