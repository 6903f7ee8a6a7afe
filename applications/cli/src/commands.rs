//! Command definitions and dispatch
//!
//! Every command runs against a restored session; queue mutations persist
//! through the session itself.

use crate::error::{CliError, Result};
use crate::view::QueueView;
use cadence_core::Song;
use cadence_playback::{RepeatMode, Session};
use clap::Subcommand;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the queue and playback modes
    Status,

    /// Edit the queue
    #[command(subcommand)]
    Queue(QueueCommand),

    /// Skip to the next song
    Next,

    /// Go back to the previous song
    Previous,

    /// Toggle shuffle
    Shuffle,

    /// Set repeat mode (off, all, one)
    Repeat {
        /// Repeat mode
        mode: RepeatMode,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum QueueCommand {
    /// Replace the queue with songs from a JSON file
    Set {
        /// JSON file with a song or an array of songs
        file: PathBuf,

        /// Index of the song to start with
        #[arg(short, long, default_value_t = 0)]
        start: usize,
    },

    /// Append songs from a JSON file
    Add {
        /// JSON file with a song or an array of songs
        file: PathBuf,
    },

    /// Remove the entry at an index
    Remove {
        /// Queue index
        index: usize,
    },

    /// Remove everything
    Clear,
}

/// Song file contents: one song or a list
#[derive(Deserialize)]
#[serde(untagged)]
enum SongFile {
    Many(Vec<Song>),
    One(Song),
}

/// Read songs from a JSON file
pub fn read_songs(path: &Path) -> Result<Vec<Song>> {
    let raw = std::fs::read_to_string(path)?;
    let songs = match serde_json::from_str(&raw)? {
        SongFile::Many(songs) => songs,
        SongFile::One(song) => vec![song],
    };
    Ok(songs)
}

/// Apply `command` to `session` and describe the outcome
pub fn execute(session: &mut Session, command: &Command) -> Result<String> {
    let message = match command {
        Command::Status => None,
        Command::Queue(QueueCommand::Set { file, start }) => {
            let songs = read_songs(file)?;
            let count = songs.len();
            if *start >= count && count > 0 {
                return Err(CliError::InvalidInput(format!(
                    "start index {} out of range for {} songs",
                    start, count
                )));
            }
            let current = session.set_queue(songs, *start);
            info!(count, start, "Queue replaced");
            Some(match current {
                Some(song) => format!("Queue set ({} songs), playing {}", count, describe(&song)),
                None => "Queue cleared".to_string(),
            })
        }
        Command::Queue(QueueCommand::Add { file }) => {
            let songs = read_songs(file)?;
            let count = songs.len();
            for song in songs {
                session.add_to_queue(song);
            }
            Some(format!("Added {} song(s)", count))
        }
        Command::Queue(QueueCommand::Remove { index }) => match session.remove_from_queue(*index) {
            Some(song) => Some(format!("Removed {}", describe(&song))),
            None => {
                return Err(CliError::InvalidInput(format!(
                    "no queue entry at index {}",
                    index
                )))
            }
        },
        Command::Queue(QueueCommand::Clear) => {
            session.clear_queue();
            Some("Queue cleared".to_string())
        }
        Command::Next => Some(match session.play_next() {
            Some(song) => format!("Playing {}", describe(&song)),
            None => "End of queue".to_string(),
        }),
        Command::Previous => Some(match session.play_previous() {
            Some(song) => format!("Playing {}", describe(&song)),
            None => "Start of queue".to_string(),
        }),
        Command::Shuffle => {
            let enabled = session.toggle_shuffle();
            Some(format!("Shuffle {}", if enabled { "on" } else { "off" }))
        }
        Command::Repeat { mode } => {
            session.set_repeat_mode(*mode);
            Some(format!("Repeat {}", mode))
        }
    };

    let view = QueueView::from_session(session).render();
    Ok(match message {
        Some(message) => format!("{}\n\n{}", message, view),
        None => view,
    })
}

fn describe(song: &Song) -> String {
    format!("{} - {}", song.artist, song.title)
}
