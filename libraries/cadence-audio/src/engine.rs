//! Audio engine contract
//!
//! The decoder/output device is external. Implementations load media from a
//! URI and report back through a [`StatusSink`], which may be cloned into and
//! called from any thread.

use crate::error::Result;
use crossbeam_channel::Sender;

/// Opaque handle to loaded media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaHandle(u64);

impl MediaHandle {
    /// Wrap an engine-specific handle value
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Engine-specific handle value
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Platform audio session settings, applied once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSessionConfig {
    /// Keep playing while the app is in the background
    pub stay_active_in_background: bool,

    /// Lower other apps' audio instead of stopping it
    pub duck_others: bool,
}

impl Default for AudioSessionConfig {
    fn default() -> Self {
        Self {
            stay_active_in_background: true,
            duck_others: true,
        }
    }
}

/// Decoder status tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackStatus {
    /// Current position in seconds
    pub position_secs: f64,

    /// Media duration in seconds, 0 when unknown
    pub duration_secs: f64,

    /// Whether the decoder is waiting for data
    pub is_buffering: bool,

    /// Whether playback reached the end of the media
    pub did_finish: bool,
}

/// Notification from the engine about one load
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Media is ready; seeks can be applied
    Loaded,

    /// Media could not be loaded or decoding failed
    Failed(String),

    /// Periodic status
    Status(PlaybackStatus),
}

/// Engine notification tagged with the generation of the load it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct EngineCallback {
    /// Generation of the selection the load serves
    pub generation: u64,

    /// What happened
    pub event: EngineEvent,
}

/// Reporting channel handed to the engine with every load
///
/// Every notification sent through a sink carries the generation of the
/// load it was created for.
#[derive(Debug, Clone)]
pub struct StatusSink {
    generation: u64,
    tx: Sender<EngineCallback>,
}

impl StatusSink {
    pub(crate) fn new(generation: u64, tx: Sender<EngineCallback>) -> Self {
        Self { generation, tx }
    }

    /// Generation this sink reports for
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Report that the media is ready
    pub fn loaded(&self) -> bool {
        self.send(EngineEvent::Loaded)
    }

    /// Report a load or decode failure
    pub fn failed(&self, reason: impl Into<String>) -> bool {
        self.send(EngineEvent::Failed(reason.into()))
    }

    /// Report a status tick
    pub fn status(&self, status: PlaybackStatus) -> bool {
        self.send(EngineEvent::Status(status))
    }

    /// Returns false once the controller is gone
    fn send(&self, event: EngineEvent) -> bool {
        self.tx
            .send(EngineCallback {
                generation: self.generation,
                event,
            })
            .is_ok()
    }
}

/// Parameters for one load
#[derive(Debug, Clone)]
pub struct LoadRequest {
    /// Media location
    pub uri: String,

    /// Start playing as soon as possible
    pub autoplay: bool,

    /// Initial volume in `[0.0, 1.0]`
    pub volume: f32,

    /// Where the engine reports progress for this load
    pub sink: StatusSink,
}

impl LoadRequest {
    /// Generation of the selection this load serves
    pub fn generation(&self) -> u64 {
        self.sink.generation()
    }
}

/// External audio decoder/output
///
/// Calls never block; results of a load arrive later through the request's
/// [`StatusSink`].
#[cfg_attr(test, mockall::automock)]
pub trait AudioEngine: Send {
    /// Configure the platform audio session
    fn configure_session(&mut self, config: &AudioSessionConfig) -> Result<()>;

    /// Start loading media
    fn load(&mut self, request: LoadRequest) -> Result<MediaHandle>;

    /// Start or resume playback
    fn play(&mut self, handle: MediaHandle) -> Result<()>;

    /// Pause playback
    fn pause(&mut self, handle: MediaHandle) -> Result<()>;

    /// Seek to a position in seconds
    fn seek(&mut self, handle: MediaHandle, position_secs: f64) -> Result<()>;

    /// Set output volume in `[0.0, 1.0]`
    fn set_volume(&mut self, handle: MediaHandle, volume: f32) -> Result<()>;

    /// Release the media
    fn unload(&mut self, handle: MediaHandle) -> Result<()>;
}
