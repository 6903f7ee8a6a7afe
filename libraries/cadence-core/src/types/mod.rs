//! Domain types for Cadence

mod ids;
mod play_event;
mod song;

pub use ids::SongId;
pub use play_event::PlayEvent;
pub use song::Song;
