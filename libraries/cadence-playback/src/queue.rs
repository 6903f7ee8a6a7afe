//! Queue engine
//!
//! Ordered playback sequence with repeat and shuffle policy:
//!
//! ```text
//! queue (play order):   [C, A, D, B]     current_index = 1 -> A
//! original (natural):   [A, B, C, D]     kept while shuffled
//! ```
//!
//! Navigation never fails. Operations on an empty queue return `None` and
//! leave everything untouched; indices are clamped instead of rejected.

use crate::events::{EventListeners, PlaybackEvent, SubscriptionId};
use crate::shuffle::shuffled_order;
use crate::snapshot::QueueSnapshot;
use crate::types::RepeatMode;
use cadence_core::{Song, SongId};
use rand::Rng;
use tracing::{debug, warn};

/// Playback queue
///
/// `songs` and `original` always hold the same multiset. While shuffle is
/// off they are also in the same order. `order` ties the two together:
/// `songs[i] == original[order[i]]`.
#[derive(Debug, Default)]
pub struct Queue {
    /// Songs in play order
    songs: Vec<Song>,

    /// Natural order, restored when shuffle is turned off
    original: Vec<Song>,

    /// Natural position of each play-order entry
    order: Vec<usize>,

    /// Position of the current song in `songs`
    current_index: Option<usize>,

    repeat: RepeatMode,
    shuffled: bool,

    listeners: EventListeners,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a queue from a persisted snapshot
    ///
    /// Out-of-range indices are clamped. A snapshot claiming to be shuffled
    /// whose original order is not a permutation of the queue is treated as
    /// unshuffled.
    pub fn from_snapshot(snapshot: QueueSnapshot) -> Self {
        let QueueSnapshot {
            repeat_mode,
            shuffle_mode,
            queue,
            current_index,
            original_queue,
        } = snapshot;

        let current_index = if queue.is_empty() || current_index < 0 {
            None
        } else {
            Some((current_index as usize).min(queue.len() - 1))
        };

        let matched = if shuffle_mode {
            natural_positions(&queue, &original_queue)
        } else {
            None
        };
        if shuffle_mode && matched.is_none() {
            warn!(
                queue = queue.len(),
                original = original_queue.len(),
                "Persisted shuffle order does not match queue, dropping shuffle"
            );
        }

        let (shuffled, original, order) = match matched {
            Some(order) => (true, original_queue, order),
            None => (false, queue.clone(), (0..queue.len()).collect()),
        };

        Self {
            songs: queue,
            original,
            order,
            current_index,
            repeat: repeat_mode,
            shuffled,
            listeners: EventListeners::new(),
        }
    }

    /// Snapshot of the persisted subset
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            repeat_mode: self.repeat,
            shuffle_mode: self.shuffled,
            queue: self.songs.clone(),
            current_index: self.current_index.map_or(-1, |i| i as i64),
            original_queue: self.original.clone(),
        }
    }

    // ===== Mutations =====

    /// Replace the queue
    ///
    /// Both the play order and the natural order become `songs`; the shuffle
    /// flag is left as it is. Returns the song at `start_index`, or `None`
    /// (with the index unset) when `start_index` is out of range.
    pub fn set_queue(&mut self, songs: Vec<Song>, start_index: usize) -> Option<Song> {
        self.original.clone_from(&songs);
        self.order = (0..songs.len()).collect();
        self.songs = songs;
        self.current_index = (start_index < self.songs.len()).then_some(start_index);

        debug!(
            length = self.songs.len(),
            current_index = ?self.current_index,
            "Queue replaced"
        );

        self.emit_queue_changed();
        self.current_song().cloned()
    }

    /// Append a song
    ///
    /// Also appended to the natural order, so turning shuffle off keeps it.
    pub fn add_to_queue(&mut self, song: Song) {
        self.order.push(self.original.len());
        self.original.push(song.clone());
        self.songs.push(song);
        self.emit_queue_changed();
    }

    /// Remove the entry at `index`
    ///
    /// Returns the removed song, or `None` if the index is out of range.
    /// Entries before the current one shift it down by one; removing the
    /// current entry leaves the index pointing at the following song (or the
    /// new last song).
    pub fn remove_from_queue(&mut self, index: usize) -> Option<Song> {
        if index >= self.songs.len() {
            return None;
        }

        let removed = self.songs.remove(index);

        // Drop the same entry from the natural order
        let natural = self.order.remove(index);
        if natural < self.original.len() {
            self.original.remove(natural);
        }
        for position in &mut self.order {
            if *position > natural {
                *position -= 1;
            }
        }

        self.current_index = match self.current_index {
            _ if self.songs.is_empty() => None,
            Some(current) if index < current => Some(current - 1),
            Some(current) => Some(current.min(self.songs.len() - 1)),
            None => None,
        };

        self.emit_queue_changed();
        Some(removed)
    }

    /// Remove everything
    pub fn clear_queue(&mut self) {
        self.songs.clear();
        self.original.clear();
        self.order.clear();
        self.current_index = None;
        self.emit_queue_changed();
    }

    /// Advance and return the next song
    ///
    /// - `One`: stays on the current entry
    /// - `All`: wraps from the last entry to the first
    /// - `Off`: returns `None` at the end without moving
    pub fn play_next(&mut self) -> Option<Song> {
        let len = self.songs.len();
        if len == 0 {
            return None;
        }

        let target = match (self.repeat, self.current_index) {
            (RepeatMode::One, Some(current)) => current,
            (_, current) => {
                let next = current.map_or(0, |i| i + 1);
                if next < len {
                    next
                } else if self.repeat == RepeatMode::All {
                    0
                } else {
                    return None;
                }
            }
        };

        self.move_to(target)
    }

    /// Step back and return the previous song
    ///
    /// Wraps to the last entry under `All`. `One` gets no special treatment:
    /// previous always steps back.
    pub fn play_previous(&mut self) -> Option<Song> {
        let len = self.songs.len();
        if len == 0 {
            return None;
        }

        let target = match self.current_index {
            Some(current) if current > 0 => current - 1,
            _ if self.repeat == RepeatMode::All => len - 1,
            _ => return None,
        };

        self.move_to(target)
    }

    /// Set repeat mode
    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat = mode;
        self.listeners
            .emit(&PlaybackEvent::RepeatModeChanged { mode });
    }

    /// Toggle shuffle using the thread-local RNG
    ///
    /// Returns the new shuffle state.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.toggle_shuffle_with(&mut rand::thread_rng())
    }

    /// Toggle shuffle using the given RNG
    ///
    /// Enabling keeps the natural order aside and permutes the play order,
    /// following the current entry to its new position. Disabling restores
    /// the natural order and maps the current entry back to its natural
    /// position.
    pub fn toggle_shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.shuffled {
            let natural = self
                .current_index
                .and_then(|current| self.order.get(current).copied())
                .filter(|&natural| natural < self.original.len());
            let current_id = self.current_song().map(|s| s.id);
            self.songs = self.original.clone();
            self.order = (0..self.songs.len()).collect();
            self.current_index = natural.or_else(|| self.relocate(current_id));
            self.shuffled = false;
        } else {
            self.original = self.songs.clone();
            let order = shuffled_order(self.songs.len(), rng);
            self.songs = order.iter().map(|&i| self.original[i].clone()).collect();
            self.current_index = self
                .current_index
                .map(|current| order.iter().position(|&i| i == current).unwrap_or(0));
            self.order = order;
            self.shuffled = true;
        }

        debug!(
            shuffled = self.shuffled,
            current_index = ?self.current_index,
            "Shuffle toggled"
        );

        self.listeners.emit(&PlaybackEvent::ShuffleChanged {
            enabled: self.shuffled,
        });
        self.emit_queue_changed();
        self.shuffled
    }

    // ===== Queries =====

    /// Whether `play_next` would return a song
    pub fn has_next(&self) -> bool {
        if self.songs.is_empty() {
            return false;
        }
        match self.repeat {
            RepeatMode::All | RepeatMode::One => true,
            RepeatMode::Off => self
                .current_index
                .map_or(true, |current| current + 1 < self.songs.len()),
        }
    }

    /// Whether `play_previous` would return a song
    pub fn has_previous(&self) -> bool {
        if self.songs.is_empty() {
            return false;
        }
        self.repeat == RepeatMode::All || matches!(self.current_index, Some(current) if current > 0)
    }

    /// Song at the current index
    pub fn current_song(&self) -> Option<&Song> {
        self.current_index.and_then(|i| self.songs.get(i))
    }

    /// Songs in play order
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Songs in natural order
    pub fn original_songs(&self) -> &[Song] {
        &self.original
    }

    /// Current position
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Repeat mode
    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    /// Whether shuffle is on
    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    /// Total number of songs in queue
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    // ===== Listeners =====

    /// Register a change listener
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PlaybackEvent) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Remove a change listener
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // ===== Internals =====

    fn move_to(&mut self, target: usize) -> Option<Song> {
        self.current_index = Some(target);
        self.emit_queue_changed();
        self.songs.get(target).cloned()
    }

    fn relocate(&self, id: Option<SongId>) -> Option<usize> {
        if self.songs.is_empty() {
            return None;
        }
        let id = id?;
        Some(self.songs.iter().position(|s| s.id == id).unwrap_or(0))
    }

    fn emit_queue_changed(&mut self) {
        self.listeners.emit(&PlaybackEvent::QueueChanged {
            length: self.songs.len(),
            current_index: self.current_index,
        });
    }
}

/// Pair every `queue` entry with a distinct `original` entry
///
/// Identical songs are paired first, then the rest by id. `None` when the
/// two lists do not hold the same songs.
fn natural_positions(queue: &[Song], original: &[Song]) -> Option<Vec<usize>> {
    if queue.len() != original.len() {
        return None;
    }

    let mut taken = vec![false; original.len()];
    let mut order: Vec<Option<usize>> = vec![None; queue.len()];
    let passes: [fn(&Song, &Song) -> bool; 2] = [|a, b| a == b, Song::same_song];

    for matches in passes {
        for (slot, song) in order.iter_mut().zip(queue) {
            if slot.is_some() {
                continue;
            }
            let found = original
                .iter()
                .enumerate()
                .position(|(i, candidate)| !taken[i] && matches(song, candidate));
            if let Some(i) = found {
                taken[i] = true;
                *slot = Some(i);
            }
        }
    }

    order.into_iter().collect()
}
