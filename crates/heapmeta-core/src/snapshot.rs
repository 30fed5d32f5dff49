//! # Snapshots
//!
//! Development-only dump of a session's store and ignore-list, used to
//! survive a reload of the tool itself.
//!
//! The file is a versioned JSON document. It is not an interchange format:
//! a snapshot written by another version is refused rather than migrated.
//!
//! ```text
//! {
//!   "version": 1,
//!   "records": [
//!     { "address": 16, "fields": { "tag": { "plain": "victim" } } }
//!   ],
//!   "backtrace_ignore": ["free"]
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MetaError, MetaResult};
use crate::ignore::IgnoreSet;
use crate::store::MetadataStore;
use crate::types::{Address, Record};

/// Format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SnapshotRecord
{
    address: Address,
    fields: Record,
}

/// Serializable copy of a store and an ignore-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot
{
    version: u32,
    records: Vec<SnapshotRecord>,
    backtrace_ignore: Vec<String>,
}

impl Snapshot
{
    /// Copy the current state.
    pub fn capture(store: &MetadataStore, ignore: &IgnoreSet) -> Self
    {
        Self {
            version: SNAPSHOT_VERSION,
            records: store
                .iter()
                .map(|(address, record)| SnapshotRecord {
                    address,
                    fields: record.clone(),
                })
                .collect(),
            backtrace_ignore: ignore.iter().map(str::to_string).collect(),
        }
    }

    /// Rebuild the store and ignore-list.
    pub fn restore(self) -> (MetadataStore, IgnoreSet)
    {
        let mut store = MetadataStore::new();
        for record in self.records {
            store.insert_record(record.address, record.fields);
        }
        let mut ignore = IgnoreSet::new();
        ignore.add_all(self.backtrace_ignore);
        (store, ignore)
    }

    /// Write the snapshot as JSON.
    ///
    /// ## Errors
    ///
    /// `Io` or `Json` when the file cannot be written.
    pub fn write_to(&self, path: &Path) -> MetaResult<()>
    {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        debug!(path = %path.display(), records = self.records.len(), "wrote snapshot");
        Ok(())
    }

    /// Read a snapshot written by [`Snapshot::write_to`].
    ///
    /// ## Errors
    ///
    /// `Io` or `Json` for unreadable files, `SnapshotVersion` for files
    /// written by another format version.
    pub fn read_from(path: &Path) -> MetaResult<Self>
    {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(MetaError::SnapshotVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        debug!(path = %path.display(), records = snapshot.records.len(), "read snapshot");
        Ok(snapshot)
    }
}
