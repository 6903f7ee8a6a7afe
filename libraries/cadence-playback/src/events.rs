//! Playback Events
//!
//! Change notification for UI synchronization. `PlaybackState` and `Queue`
//! each own an `EventListeners` list and emit one event synchronously after
//! every completed mutation, so a listener always observes a consistent
//! state.

use crate::types::RepeatMode;
use cadence_core::SongId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Events emitted by the playback state and the queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// A different song was selected (or the selection was cleared)
    SongChanged {
        /// ID of the new current song
        song_id: Option<SongId>,
        /// Generation of the selection
        generation: u64,
    },

    /// Transport flag changed
    PlayingChanged {
        /// Whether playback should be running
        is_playing: bool,
    },

    /// Current time updated (seconds)
    TimeUpdated {
        /// Current position
        current_time: f64,
    },

    /// Duration updated (seconds)
    DurationUpdated {
        /// Track duration
        duration: f64,
    },

    /// Progress updated (percent)
    ProgressUpdated {
        /// Progress in `[0, 100]`
        progress: f64,
    },

    /// A seek was requested
    SeekRequested {
        /// Target position in seconds
        position: f64,
    },

    /// The pending seek request was consumed
    SeekCleared,

    /// Loading flag changed
    LoadingChanged {
        /// Whether media is loading
        is_loading: bool,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume in `[0.0, 1.0]`
        volume: f32,
    },

    /// Error indicator changed
    ErrorChanged {
        /// Error message, `None` when cleared
        message: Option<String>,
    },

    /// Queue changed (tracks added/removed/reordered or position moved)
    QueueChanged {
        /// New queue length
        length: usize,
        /// New current index
        current_index: Option<usize>,
    },

    /// Repeat mode changed
    RepeatModeChanged {
        /// New mode
        mode: RepeatMode,
    },

    /// Shuffle toggled
    ShuffleChanged {
        /// Whether shuffle is now enabled
        enabled: bool,
    },
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&PlaybackEvent)>;

/// Registered listeners, notified in subscription order
#[derive(Default)]
pub struct EventListeners {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl EventListeners {
    /// Create an empty listener list
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PlaybackEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener
    ///
    /// Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    /// Notify every listener
    pub fn emit(&mut self, event: &PlaybackEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check if no listener is registered
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
