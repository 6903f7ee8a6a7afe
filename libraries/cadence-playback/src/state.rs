//! Playback state
//!
//! Single source of truth for "what is the currently loaded song doing".
//!
//! Field ownership:
//! - UI / queue navigation: `current_song`, `is_playing`, `volume`, seek request
//! - Audio engine adapter: `current_time`, `duration`, `progress`,
//!   `is_loading`, `error`, seek fulfilment
//!
//! The timing setters perform no validation; the adapter supplies values
//! already computed with [`progress_for`].

use crate::events::{EventListeners, PlaybackEvent, SubscriptionId};
use cadence_core::Song;
use tracing::debug;

/// Mutable playback state
#[derive(Debug)]
pub struct PlaybackState {
    current_song: Option<Song>,
    is_playing: bool,
    current_time: f64,
    duration: f64,
    progress: f64,
    seek_to_position: Option<f64>,
    is_loading: bool,
    volume: f32,
    error: Option<String>,

    /// Bumped on every song change; tags engine loads
    generation: u64,

    listeners: EventListeners,
}

impl PlaybackState {
    /// Create an idle state with nothing selected
    pub fn new() -> Self {
        Self {
            current_song: None,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            progress: 0.0,
            seek_to_position: None,
            is_loading: false,
            volume: 1.0,
            error: None,
            generation: 0,
            listeners: EventListeners::new(),
        }
    }

    // ===== Mutations =====

    /// Replace the current song
    ///
    /// Resets time, duration and progress, marks the state as loading and
    /// starts a new generation. Never touches `is_playing`.
    pub fn set_current_song(&mut self, song: Option<Song>) {
        self.generation += 1;
        self.is_loading = song.is_some();
        self.current_time = 0.0;
        self.duration = 0.0;
        self.progress = 0.0;
        self.error = None;

        debug!(
            song_id = ?song.as_ref().map(|s| s.id),
            generation = self.generation,
            "Current song changed"
        );

        let song_id = song.as_ref().map(|s| s.id);
        self.current_song = song;
        self.emit(PlaybackEvent::SongChanged {
            song_id,
            generation: self.generation,
        });
    }

    /// Set the transport flag
    pub fn set_is_playing(&mut self, is_playing: bool) {
        self.is_playing = is_playing;
        self.emit(PlaybackEvent::PlayingChanged { is_playing });
    }

    /// Set current position in seconds
    pub fn set_current_time(&mut self, current_time: f64) {
        self.current_time = current_time;
        self.emit(PlaybackEvent::TimeUpdated { current_time });
    }

    /// Set track duration in seconds
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
        self.emit(PlaybackEvent::DurationUpdated { duration });
    }

    /// Set progress percentage
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = progress;
        self.emit(PlaybackEvent::ProgressUpdated { progress });
    }

    /// Request a seek; the adapter performs it
    pub fn seek_to(&mut self, position: f64) {
        self.seek_to_position = Some(position);
        self.emit(PlaybackEvent::SeekRequested { position });
    }

    /// Consume the pending seek request
    pub fn clear_seek(&mut self) {
        self.seek_to_position = None;
        self.emit(PlaybackEvent::SeekCleared);
    }

    /// Override the loading flag
    pub fn set_is_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
        self.emit(PlaybackEvent::LoadingChanged { is_loading });
    }

    /// Set volume, clamped to `[0.0, 1.0]`
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.volume = volume;
        self.emit(PlaybackEvent::VolumeChanged { volume });
    }

    /// Raise the error indicator
    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.error = Some(message.clone());
        self.emit(PlaybackEvent::ErrorChanged {
            message: Some(message),
        });
    }

    /// Clear the error indicator
    pub fn clear_error(&mut self) {
        self.error = None;
        self.emit(PlaybackEvent::ErrorChanged { message: None });
    }

    // ===== Queries =====

    /// Currently selected song
    pub fn current_song(&self) -> Option<&Song> {
        self.current_song.as_ref()
    }

    /// Whether playback should be running
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Position in seconds, as fresh as the last decoder status
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Progress percentage
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Pending seek request
    pub fn seek_to_position(&self) -> Option<f64> {
        self.seek_to_position
    }

    /// Whether the current song is still loading
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Volume in `[0.0, 1.0]`
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Last load error, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Generation of the current selection
    pub fn generation(&self) -> u64 {
        self.generation
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

    fn emit(&mut self, event: PlaybackEvent) {
        self.listeners.emit(&event);
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress percentage for a position within a duration
///
/// 0 when the duration is unknown, otherwise clamped to `[0, 100]`.
pub fn progress_for(current_time: f64, duration: f64) -> f64 {
    if duration > 0.0 && current_time.is_finite() {
        (100.0 * current_time / duration).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Format seconds as `m:ss`
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    };
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, secs)
}
