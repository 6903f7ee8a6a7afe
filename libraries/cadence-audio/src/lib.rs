//! Audio engine adapter for Cadence
//!
//! This crate connects the platform-agnostic `PlaybackState` to an external
//! audio decoder through the `AudioEngine` trait.
//!
//! # Features
//!
//! - Loads the current song whenever the selection changes, releasing the
//!   previous media first
//! - Forwards play/pause, volume and seek requests
//! - Feeds decoder status (time, duration, progress) back into the state
//! - Discards notifications from superseded loads
//! - Reports finished or replaced songs to a `PlayReporter`
//!
//! # Example
//!
//! ```no_run
//! use cadence_audio::{AudioController, AudioEngine, AudioSessionConfig};
//! use cadence_playback::{PlaybackConfig, Session};
//!
//! # fn run<E: AudioEngine>(engine: E) -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new(PlaybackConfig::default());
//! let mut audio = AudioController::new(engine, AudioSessionConfig::default())?;
//!
//! // On every UI tick:
//! audio.sync(session.state_mut());
//! if audio.pump(session.state_mut()).is_some() {
//!     session.advance_after_finish();
//!     audio.sync(session.state_mut());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod adapter;
mod engine;
mod error;

pub use adapter::AudioController;
pub use engine::{
    AudioEngine, AudioSessionConfig, EngineCallback, EngineEvent, LoadRequest, MediaHandle,
    PlaybackStatus, StatusSink,
};
pub use error::{AudioError, Result};
