/// Core traits for Cadence
use crate::types::PlayEvent;

/// Listening history collaborator
///
/// Receives a `PlayEvent` whenever a song that actually played is released
/// by the audio engine adapter. Implementations are expected to be
/// fire-and-forget (queue the request, never block the caller) and to
/// swallow their own failures; the playback engine does not retry.
pub trait PlayReporter: Send {
    /// Record one play
    fn report_play(&mut self, event: PlayEvent);
}

impl<F> PlayReporter for F
where
    F: FnMut(PlayEvent) + Send,
{
    fn report_play(&mut self, event: PlayEvent) {
        self(event);
    }
}
