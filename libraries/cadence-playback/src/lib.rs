//! Cadence - Playback Management
//!
//! Platform-agnostic playback state and queue engine for Cadence.
//!
//! This crate provides:
//! - Playback state (current song, transport flag, time/progress, seek request)
//! - Queue engine with repeat modes (Off, All, One) and shuffle
//! - Recently played list (bounded, most recent first)
//! - Change notification for UI synchronization
//! - A persistence seam (`QueuePersistence`) for the queue subset
//!
//! # Architecture
//!
//! `cadence-playback` is completely platform-agnostic:
//! - No dependency on an audio decoder (see `cadence-audio`)
//! - No dependency on `cadence-storage` (database)
//! - Single-threaded; every operation returns immediately
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use cadence_playback::{PlaybackConfig, Session};
//! use cadence_core::Song;
//!
//! let mut session = Session::new(PlaybackConfig::default());
//!
//! let songs = vec![
//!     Song::new(1, "So What", "Miles Davis", "9:22", "https://cdn.example/1.mp3"),
//!     Song::new(2, "Freddie Freeloader", "Miles Davis", "9:46", "https://cdn.example/2.mp3"),
//! ];
//!
//! // Selecting through the session starts playback
//! let current = session.set_queue(songs, 0).unwrap();
//! assert_eq!(current.title, "So What");
//! assert!(session.state().is_playing());
//!
//! let next = session.play_next().unwrap();
//! assert_eq!(next.title, "Freddie Freeloader");
//! assert!(session.play_next().is_none());
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! use cadence_playback::{Queue, RepeatMode};
//! use cadence_core::Song;
//!
//! let mut queue = Queue::new();
//! queue.set_queue(
//!     (1..=5).map(|i| Song::new(i, format!("Track {i}"), "Artist", "3:00", "")).collect(),
//!     2,
//! );
//!
//! queue.set_repeat_mode(RepeatMode::All);
//! let current = queue.current_song().cloned();
//!
//! queue.toggle_shuffle();
//! assert_eq!(queue.current_song().cloned(), current);
//!
//! queue.toggle_shuffle();
//! assert_eq!(queue.songs(), queue.original_songs());
//! ```
//!
//! # Example: Listening for Changes
//!
//! ```rust
//! use cadence_playback::{PlaybackEvent, PlaybackState};
//!
//! let mut state = PlaybackState::new();
//! state.subscribe(|event| {
//!     if let PlaybackEvent::PlayingChanged { is_playing } = event {
//!         println!("playing: {is_playing}");
//!     }
//! });
//! state.set_is_playing(true);
//! ```

pub mod events;
mod queue;
mod recent;
mod session;
mod shuffle;
pub mod snapshot;
mod state;
pub mod types;

// Public exports
pub use events::{EventListeners, PlaybackEvent, SubscriptionId};
pub use queue::Queue;
pub use recent::{RecentlyPlayed, DEFAULT_RECENT_CAPACITY};
pub use session::Session;
pub use shuffle::shuffled_order;
pub use snapshot::{QueuePersistence, QueueSnapshot};
pub use state::{format_time, progress_for, PlaybackState};
pub use types::{PlaybackConfig, RepeatMode};
