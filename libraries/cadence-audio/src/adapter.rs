//! Audio engine adapter
//!
//! Keeps an [`AudioEngine`] in step with a [`PlaybackState`]:
//!
//! ```text
//!   PlaybackState ──sync()──► AudioEngine
//!        ▲                        │ StatusSink (any thread)
//!        └──────pump()◄── channel ┘
//! ```
//!
//! `sync` reconciles what the state asks for (song, transport, volume, seek)
//! with what was last applied to the engine. `pump` drains engine
//! notifications and writes time, duration, progress and the loading/error
//! flags back. Notifications from a superseded load are discarded by
//! generation.

use crate::engine::{
    AudioEngine, AudioSessionConfig, EngineCallback, EngineEvent, LoadRequest, MediaHandle,
    PlaybackStatus, StatusSink,
};
use crate::error::{AudioError, Result};
use cadence_core::{PlayEvent, PlayReporter, SongId};
use cadence_playback::{progress_for, PlaybackState};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::fmt;
use tracing::{debug, trace, warn};

/// Media currently owned by the controller
#[derive(Debug)]
struct ActiveMedia {
    handle: MediaHandle,
    song_id: SongId,
    generation: u64,
    loaded: bool,
    position: f64,
    duration: f64,
    reported: bool,
}

/// Adapter between playback state and an audio engine
pub struct AudioController<E: AudioEngine> {
    engine: E,
    tx: Sender<EngineCallback>,
    rx: Receiver<EngineCallback>,
    reporter: Option<Box<dyn PlayReporter>>,
    active: Option<ActiveMedia>,

    /// Generation a pending seek is waiting on
    deferred_seek: Option<u64>,

    // Last values pushed to the engine
    applied_generation: u64,
    applied_playing: bool,
    applied_volume: f32,
}

impl<E: AudioEngine> AudioController<E> {
    /// Wrap `engine`, configuring the audio session once
    pub fn new(mut engine: E, session: AudioSessionConfig) -> Result<Self> {
        engine
            .configure_session(&session)
            .map_err(|e| AudioError::Session(e.to_string()))?;
        debug!(?session, "Audio session configured");

        let (tx, rx) = unbounded();
        Ok(Self {
            engine,
            tx,
            rx,
            reporter: None,
            active: None,
            deferred_seek: None,
            applied_generation: 0,
            applied_playing: false,
            applied_volume: 1.0,
        })
    }

    /// Send a play event for every song that actually advanced
    pub fn with_reporter(mut self, reporter: Box<dyn PlayReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Underlying engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Handle of the media currently owned, if any
    pub fn active_handle(&self) -> Option<MediaHandle> {
        self.active.as_ref().map(|m| m.handle)
    }

    /// Apply pending state changes to the engine
    ///
    /// Call after mutating the state. Order: song, transport, volume, seek.
    pub fn sync(&mut self, state: &mut PlaybackState) {
        if state.generation() != self.applied_generation {
            self.switch_song(state);
        }

        if state.is_playing() != self.applied_playing {
            self.applied_playing = state.is_playing();
            if let Some(media) = &self.active {
                let result = if state.is_playing() {
                    self.engine.play(media.handle)
                } else {
                    self.engine.pause(media.handle)
                };
                if let Err(e) = result {
                    warn!(error = %e, playing = state.is_playing(), "Transport change failed");
                }
            }
        }

        if state.volume() != self.applied_volume {
            self.applied_volume = state.volume();
            if let Some(media) = &self.active {
                if let Err(e) = self.engine.set_volume(media.handle, state.volume()) {
                    warn!(error = %e, "Volume change failed");
                }
            }
        }

        self.apply_seek(state);
    }

    /// Drain engine notifications into the state
    ///
    /// Returns the id of the song that reached its end, if any; the caller
    /// decides whether to advance.
    pub fn pump(&mut self, state: &mut PlaybackState) -> Option<SongId> {
        let mut finished = None;

        while let Ok(callback) = self.rx.try_recv() {
            let current = self
                .active
                .as_ref()
                .is_some_and(|m| m.generation == callback.generation)
                && callback.generation == state.generation();
            if !current {
                trace!(
                    generation = callback.generation,
                    active = state.generation(),
                    "Discarding stale engine callback"
                );
                continue;
            }

            match callback.event {
                EngineEvent::Loaded => {
                    if let Some(media) = &mut self.active {
                        media.loaded = true;
                    }
                    if state.is_loading() {
                        state.set_is_loading(false);
                    }
                    self.apply_seek(state);
                }
                EngineEvent::Failed(reason) => self.fail_load(state, &reason),
                EngineEvent::Status(status) => {
                    if let Some(id) = self.apply_status(state, status) {
                        finished = Some(id);
                    }
                }
            }
        }

        finished
    }

    /// Release the active media, if any
    pub fn release(&mut self) {
        if let Some(media) = self.active.take() {
            self.report(&media);
            if let Err(e) = self.engine.unload(media.handle) {
                warn!(error = %e, handle = media.handle.get(), "Failed to unload media");
            }
            debug!(song_id = %media.song_id, "Media released");
        }
    }

    // ===== Internals =====

    fn switch_song(&mut self, state: &mut PlaybackState) {
        self.release();

        // A seek still waiting on the old media does not carry over
        if let Some(generation) = self.deferred_seek.take() {
            if state.seek_to_position().is_some() {
                debug!(generation, "Dropping seek for replaced media");
                state.clear_seek();
            }
        }

        self.applied_generation = state.generation();
        self.applied_playing = state.is_playing();
        self.applied_volume = state.volume();

        let Some(song) = state.current_song().cloned() else {
            return;
        };

        let request = LoadRequest {
            uri: song.file_url.clone(),
            autoplay: state.is_playing(),
            volume: state.volume(),
            sink: StatusSink::new(state.generation(), self.tx.clone()),
        };

        debug!(
            song_id = %song.id,
            generation = state.generation(),
            autoplay = request.autoplay,
            "Loading media"
        );

        match self.engine.load(request) {
            Ok(handle) => {
                self.active = Some(ActiveMedia {
                    handle,
                    song_id: song.id,
                    generation: state.generation(),
                    loaded: false,
                    position: 0.0,
                    duration: 0.0,
                    reported: false,
                });
            }
            Err(e) => self.fail_load(state, &e.to_string()),
        }
    }

    fn apply_status(&mut self, state: &mut PlaybackState, status: PlaybackStatus) -> Option<SongId> {
        let media = self.active.as_mut()?;
        media.loaded = true;
        media.position = status.position_secs;
        media.duration = status.duration_secs;

        state.set_current_time(status.position_secs);
        state.set_duration(status.duration_secs);
        state.set_progress(progress_for(status.position_secs, status.duration_secs));
        if state.is_loading() {
            state.set_is_loading(false);
        }

        self.apply_seek(state);

        if !status.did_finish {
            return None;
        }

        let media = self.active.as_mut()?;
        let song_id = media.song_id;
        let event = (!media.reported && media.position > 0.0).then(|| {
            media.reported = true;
            PlayEvent::new(media.song_id, media.duration, media.position)
        });
        if let Some(event) = event {
            self.send_report(event);
        }

        debug!(%song_id, "Song finished");
        self.applied_playing = false;
        state.set_is_playing(false);
        Some(song_id)
    }

    fn apply_seek(&mut self, state: &mut PlaybackState) {
        let Some(position) = state.seek_to_position() else {
            self.deferred_seek = None;
            return;
        };

        match &self.active {
            None => {
                debug!(position, "Seek with nothing loaded, dropping");
                self.deferred_seek = None;
                state.clear_seek();
            }
            // Deferred until the engine reports the media loaded
            Some(media) if !media.loaded => {
                self.deferred_seek = Some(media.generation);
            }
            Some(media) => {
                if let Err(e) = self.engine.seek(media.handle, position) {
                    warn!(error = %e, position, "Seek failed");
                }
                self.deferred_seek = None;
                state.clear_seek();
            }
        }
    }

    fn fail_load(&mut self, state: &mut PlaybackState, reason: &str) {
        warn!(generation = state.generation(), reason, "Media load failed");

        if let Some(media) = self.active.take() {
            if let Err(e) = self.engine.unload(media.handle) {
                warn!(error = %e, "Failed to unload media after load failure");
            }
        }

        self.applied_playing = false;
        state.set_is_loading(false);
        state.set_is_playing(false);
        state.set_error(reason);
    }

    fn report(&mut self, media: &ActiveMedia) {
        if !media.reported && media.position > 0.0 {
            self.send_report(PlayEvent::new(media.song_id, media.duration, media.position));
        }
    }

    fn send_report(&mut self, event: PlayEvent) {
        if let Some(reporter) = &mut self.reporter {
            trace!(song_id = %event.song_id, position = event.position, "Reporting play");
            reporter.report_play(event);
        }
    }
}

impl<E: AudioEngine> Drop for AudioController<E> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<E: AudioEngine> fmt::Debug for AudioController<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioController")
            .field("active", &self.active)
            .field("deferred_seek", &self.deferred_seek)
            .field("applied_generation", &self.applied_generation)
            .field("applied_playing", &self.applied_playing)
            .field("applied_volume", &self.applied_volume)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MockAudioEngine;
    use cadence_core::Song;
    use mockall::predicate::eq;
    use std::sync::{Arc, Mutex};

    fn song(id: i64) -> Song {
        Song::new(
            id,
            format!("Song {}", id),
            "Artist",
            "3:00",
            format!("https://cdn.example/{}.mp3", id),
        )
    }

    fn configured_mock() -> MockAudioEngine {
        let mut engine = MockAudioEngine::new();
        engine
            .expect_configure_session()
            .times(1)
            .returning(|_| Ok(()));
        engine
    }

    #[test]
    fn session_configured_once_at_construction() {
        let mut engine = MockAudioEngine::new();
        engine
            .expect_configure_session()
            .withf(|config| config.stay_active_in_background)
            .times(1)
            .returning(|_| Ok(()));

        let controller = AudioController::new(engine, AudioSessionConfig::default());
        assert!(controller.is_ok());
    }

    #[test]
    fn session_failure_is_surfaced() {
        let mut engine = MockAudioEngine::new();
        engine
            .expect_configure_session()
            .returning(|_| Err(AudioError::Engine("denied".into())));

        let err = AudioController::new(engine, AudioSessionConfig::default()).unwrap_err();
        assert!(matches!(err, AudioError::Session(_)));
    }

    #[test]
    fn load_uses_transport_and_volume() {
        let mut engine = configured_mock();
        engine
            .expect_load()
            .withf(|req| {
                req.uri == "https://cdn.example/1.mp3"
                    && req.autoplay
                    && req.volume == 0.4
                    && req.generation() == 1
            })
            .times(1)
            .returning(|_| Ok(MediaHandle::new(10)));
        engine
            .expect_unload()
            .with(eq(MediaHandle::new(10)))
            .times(1)
            .returning(|_| Ok(()));

        let mut controller = AudioController::new(engine, AudioSessionConfig::default()).unwrap();
        let mut state = PlaybackState::new();
        state.set_volume(0.4);
        state.set_current_song(Some(song(1)));
        state.set_is_playing(true);

        controller.sync(&mut state);
        assert_eq!(controller.active_handle(), Some(MediaHandle::new(10)));
        // Dropping the controller unloads
    }

    #[test]
    fn song_change_unloads_previous() {
        let mut engine = configured_mock();
        let mut next_handle = 0;
        engine.expect_load().times(2).returning(move |_| {
            next_handle += 1;
            Ok(MediaHandle::new(next_handle))
        });
        engine
            .expect_unload()
            .with(eq(MediaHandle::new(1)))
            .times(1)
            .returning(|_| Ok(()));
        engine
            .expect_unload()
            .with(eq(MediaHandle::new(2)))
            .times(1)
            .returning(|_| Ok(()));

        let mut controller = AudioController::new(engine, AudioSessionConfig::default()).unwrap();
        let mut state = PlaybackState::new();

        state.set_current_song(Some(song(1)));
        controller.sync(&mut state);
        state.set_current_song(Some(song(2)));
        controller.sync(&mut state);

        assert_eq!(controller.active_handle(), Some(MediaHandle::new(2)));
    }

    #[test]
    fn transport_change_forwarded_once() {
        let mut engine = configured_mock();
        engine
            .expect_load()
            .returning(|_| Ok(MediaHandle::new(1)));
        engine
            .expect_pause()
            .with(eq(MediaHandle::new(1)))
            .times(1)
            .returning(|_| Ok(()));
        engine.expect_unload().returning(|_| Ok(()));

        let mut controller = AudioController::new(engine, AudioSessionConfig::default()).unwrap();
        let mut state = PlaybackState::new();
        state.set_is_playing(true);
        state.set_current_song(Some(song(1)));
        controller.sync(&mut state);

        state.set_is_playing(false);
        controller.sync(&mut state);
        controller.sync(&mut state);
    }

    #[test]
    fn load_error_clears_loading_and_raises_error() {
        let mut engine = configured_mock();
        engine
            .expect_load()
            .returning(|_| Err(AudioError::LoadFailed("unsupported codec".into())));
        engine.expect_unload().never();

        let mut controller = AudioController::new(engine, AudioSessionConfig::default()).unwrap();
        let mut state = PlaybackState::new();
        state.set_current_song(Some(song(1)));
        state.set_is_playing(true);

        controller.sync(&mut state);

        assert!(!state.is_loading());
        assert!(!state.is_playing());
        assert!(state.error().unwrap().contains("unsupported codec"));
        assert!(controller.active_handle().is_none());
    }

    #[test]
    fn seek_deferred_until_loaded() {
        let sink_slot: Arc<Mutex<Option<StatusSink>>> = Arc::default();
        let slot = Arc::clone(&sink_slot);

        let mut engine = configured_mock();
        engine.expect_load().returning(move |req| {
            *slot.lock().unwrap() = Some(req.sink);
            Ok(MediaHandle::new(3))
        });
        engine
            .expect_seek()
            .with(eq(MediaHandle::new(3)), eq(42.0))
            .times(1)
            .returning(|_, _| Ok(()));
        engine.expect_unload().returning(|_| Ok(()));

        let mut controller = AudioController::new(engine, AudioSessionConfig::default()).unwrap();
        let mut state = PlaybackState::new();
        state.set_current_song(Some(song(1)));
        controller.sync(&mut state);

        state.seek_to(42.0);
        controller.sync(&mut state);
        assert_eq!(state.seek_to_position(), Some(42.0));

        sink_slot.lock().unwrap().as_ref().unwrap().loaded();
        controller.pump(&mut state);
        assert!(state.seek_to_position().is_none());
    }

    #[test]
    fn seek_failure_still_clears_request() {
        let sink_slot: Arc<Mutex<Option<StatusSink>>> = Arc::default();
        let slot = Arc::clone(&sink_slot);

        let mut engine = configured_mock();
        engine.expect_load().returning(move |req| {
            *slot.lock().unwrap() = Some(req.sink);
            Ok(MediaHandle::new(1))
        });
        engine
            .expect_seek()
            .returning(|_, _| Err(AudioError::Engine("not seekable".into())));
        engine.expect_unload().returning(|_| Ok(()));

        let mut controller = AudioController::new(engine, AudioSessionConfig::default()).unwrap();
        let mut state = PlaybackState::new();
        state.set_current_song(Some(song(1)));
        controller.sync(&mut state);
        sink_slot.lock().unwrap().as_ref().unwrap().loaded();
        controller.pump(&mut state);

        state.seek_to(5.0);
        controller.sync(&mut state);
        assert!(state.seek_to_position().is_none());
    }

    #[test]
    fn seek_with_nothing_loaded_is_dropped() {
        let mut engine = configured_mock();
        engine.expect_seek().never();

        let mut controller = AudioController::new(engine, AudioSessionConfig::default()).unwrap();
        let mut state = PlaybackState::new();
        state.seek_to(12.0);

        controller.sync(&mut state);
        assert!(state.seek_to_position().is_none());
    }
}
