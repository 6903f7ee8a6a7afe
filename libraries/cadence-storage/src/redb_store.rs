//! redb-backed store
//!
//! All records live in a single `playback_state` table keyed by namespace,
//! with the JSON record as the value.

use crate::error::Result;
use crate::store::StateStore;
use redb::{Database, ReadableTable, TableDefinition, TableError};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const STATE_TABLE: TableDefinition<&str, &str> = TableDefinition::new("playback_state");

/// Embedded database store
pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl RedbStore {
    /// Open (or create) the database file at `path`
    ///
    /// Missing parent directories are created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(path)?;
        info!(path = %path.display(), "Opened state database");

        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for RedbStore {
    fn get(&self, namespace: &str) -> Result<Option<String>> {
        let txn = self.db.begin_read()?;
        let table = match txn.open_table(STATE_TABLE) {
            Ok(table) => table,
            // Nothing has been written yet
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let record = table.get(namespace)?.map(|guard| guard.value().to_string());
        Ok(record)
    }

    fn put(&self, namespace: &str, record: &str) -> Result<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(STATE_TABLE)?;
            table.insert(namespace, record)?;
        }
        txn.commit()?;

        debug!(namespace, bytes = record.len(), "Record written");
        Ok(())
    }
}

impl fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedbStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
