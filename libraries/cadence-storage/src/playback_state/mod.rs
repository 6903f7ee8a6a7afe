//! Queue persistence across restarts
//!
//! Stores the queue snapshot as one JSON record per namespace, wrapped in a
//! versioned envelope:
//!
//! ```json
//! {"state": {"repeatMode": "all", "shuffleMode": false, "queue": [...],
//!            "currentIndex": 0, "originalQueue": [...]}, "version": 0}
//! ```
//!
//! # Example
//!
//! ```rust
//! use cadence_playback::{PlaybackConfig, Session};
//! use cadence_storage::{MemoryStore, PersistenceAdapter};
//!
//! let store = MemoryStore::new();
//! let persistence = PersistenceAdapter::new(store.clone(), "cadence-queue");
//! let session = Session::with_persistence(PlaybackConfig::default(), Box::new(persistence));
//! assert!(session.queue().is_empty());
//! ```

use crate::error::{Result, StorageError};
use crate::store::StateStore;
use cadence_playback::{QueuePersistence, QueueSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Record layout version written by this crate
pub const RECORD_VERSION: u32 = 0;

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "cadence-queue";

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a QueueSnapshot,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: serde_json::Value,
    version: u32,
}

/// Encode a snapshot as a versioned record
pub fn encode_snapshot(snapshot: &QueueSnapshot) -> Result<String> {
    let envelope = EnvelopeRef {
        state: snapshot,
        version: RECORD_VERSION,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decode a versioned record
///
/// The version is checked before the state is interpreted.
pub fn decode_snapshot(record: &str) -> Result<QueueSnapshot> {
    let envelope: Envelope = serde_json::from_str(record)?;
    if envelope.version != RECORD_VERSION {
        return Err(StorageError::UnsupportedVersion(envelope.version));
    }
    Ok(serde_json::from_value(envelope.state)?)
}

/// `QueuePersistence` over any `StateStore`
///
/// Failures are logged and swallowed: a broken record loads as nothing and
/// a failed write loses only the latest change.
#[derive(Debug)]
pub struct PersistenceAdapter<S> {
    store: S,
    namespace: String,
}

impl<S: StateStore> PersistenceAdapter<S> {
    /// Persist under `namespace` in `store`
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// Namespace the record is stored under
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the snapshot, surfacing failures
    pub fn try_load(&self) -> Result<Option<QueueSnapshot>> {
        self.store
            .get(&self.namespace)?
            .map(|record| decode_snapshot(&record))
            .transpose()
    }

    /// Save the snapshot, surfacing failures
    pub fn try_save(&self, snapshot: &QueueSnapshot) -> Result<()> {
        let record = encode_snapshot(snapshot)?;
        self.store.put(&self.namespace, &record)
    }
}

impl<S: StateStore> QueuePersistence for PersistenceAdapter<S> {
    fn load(&self) -> Option<QueueSnapshot> {
        match self.try_load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(namespace = %self.namespace, error = %e, "Failed to load queue state");
                None
            }
        }
    }

    fn save(&self, snapshot: &QueueSnapshot) {
        match self.try_save(snapshot) {
            Ok(()) => debug!(
                namespace = %self.namespace,
                length = snapshot.queue.len(),
                "Queue state saved"
            ),
            Err(e) => {
                warn!(namespace = %self.namespace, error = %e, "Failed to save queue state");
            }
        }
    }
}
