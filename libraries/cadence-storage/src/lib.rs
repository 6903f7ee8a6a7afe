//! Cadence Storage
//!
//! Embedded persistence layer for Cadence playback state.
//!
//! This crate provides:
//! - **Stores**: `RedbStore` (embedded database file) and `MemoryStore`
//!   (tests, ephemeral sessions), both behind the `StateStore` trait
//! - **Queue persistence**: `PersistenceAdapter`, which implements the
//!   playback engine's `QueuePersistence` seam over any store
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_playback::{PlaybackConfig, Session};
//! use cadence_storage::{PersistenceAdapter, RedbStore, DEFAULT_NAMESPACE};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = RedbStore::open("cadence.redb")?;
//! let persistence = PersistenceAdapter::new(store, DEFAULT_NAMESPACE);
//!
//! // Queue is restored from the last run and saved after every change
//! let mut session = Session::with_persistence(PlaybackConfig::default(), Box::new(persistence));
//! session.play_next();
//! # Ok(())
//! # }
//! ```

mod error;
mod redb_store;
mod store;

// Vertical slices
pub mod playback_state;

pub use error::{Result, StorageError};
pub use playback_state::{
    decode_snapshot, encode_snapshot, PersistenceAdapter, DEFAULT_NAMESPACE, RECORD_VERSION,
};
pub use redb_store::RedbStore;
pub use store::{MemoryStore, StateStore};
