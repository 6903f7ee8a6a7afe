//! Cadence CLI Library
//!
//! Command-line front end over the playback queue: configuration, command
//! dispatch and queue rendering.
//!
//! This library exposes the core components for testing purposes.

pub mod commands;
pub mod config;
pub mod error;
pub mod view;

// Re-export commonly used types for convenience
pub use commands::{execute, read_songs, Command, QueueCommand};
pub use config::CadenceConfig;
pub use error::{CliError, Result};
pub use view::QueueView;

use cadence_playback::Session;
use cadence_storage::{PersistenceAdapter, RedbStore};

/// Open the configured store and restore the session from it
pub fn open_session(config: &CadenceConfig) -> Result<Session> {
    let store = RedbStore::open(&config.storage.database_path)?;
    let persistence = PersistenceAdapter::new(store, config.storage.namespace.clone());
    Ok(Session::with_persistence(
        config.playback_config(),
        Box::new(persistence),
    ))
}
