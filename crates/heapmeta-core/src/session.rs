//! # Session
//!
//! Owns the state of one debugging session and is the only write path into
//! it.
//!
//! A [`Session`] is created empty when the tool starts, may be replaced from
//! a snapshot, and is dropped when the tool exits. Readers
//! ([`QueryEngine`], [`DisplayFormatter`]) borrow its store and ignore-list
//! for the duration of one command.
//!
//! ## Lifecycle
//!
//! 1. Create: `Session::new()`
//! 2. Annotate: `add()`, `delete()`, `configure()`
//! 3. Inspect: `query()`, `formatter()`
//! 4. Optionally persist: `save_snapshot()` / `load_snapshot()`
//!
//! Every mutator validates its input before touching state, so an `Err`
//! leaves the session unchanged.

use std::path::Path;

use tracing::debug;

use crate::debugger::Debugger;
use crate::display::DisplayFormatter;
use crate::error::{MetaError, MetaResult};
use crate::ignore::IgnoreSet;
use crate::query::{FieldSelection, QueryEngine, QueryResult};
use crate::snapshot::Snapshot;
use crate::store::MetadataStore;
use crate::types::{Address, Color, FieldValue, BACKTRACE_KEY, COLOR_KEY};

/// The only feature `configure` supports.
pub const IGNORE_FEATURE: &str = "ignore";

/// Metadata store and backtrace ignore-list of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session
{
    store: MetadataStore,
    ignore: IgnoreSet,
}

impl Session
{
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn store(&self) -> &MetadataStore
    {
        &self.store
    }

    pub fn ignore(&self) -> &IgnoreSet
    {
        &self.ignore
    }

    /// Attach `key` to the chunk at `address`.
    ///
    /// - `backtrace`: `value` is ignored and the current stack is captured
    ///   from `debugger`.
    /// - `color`: `value` must name a palette entry.
    /// - anything else: `value` is stored verbatim.
    ///
    /// ## Errors
    ///
    /// - `MissingValue`: no value for a key other than `backtrace`
    /// - `UnsupportedColor`: the color is not in the palette
    /// - whatever the debugger reports when capturing a backtrace
    pub fn add(
        &mut self,
        debugger: &mut dyn Debugger,
        address: Address,
        key: &str,
        value: Option<&str>,
    ) -> MetaResult<()>
    {
        let field = match key {
            BACKTRACE_KEY => FieldValue::Backtrace(debugger.capture_backtrace()?),
            COLOR_KEY => {
                let name = value.ok_or_else(|| MetaError::MissingValue(key.to_string()))?;
                FieldValue::Color(name.parse::<Color>()?)
            }
            _ => FieldValue::Plain(value.ok_or_else(|| MetaError::MissingValue(key.to_string()))?.to_string()),
        };
        debug!(%address, key, "adding metadata");
        self.store.put(address, key, field);
        Ok(())
    }

    /// Drop every field of the chunk at `address`.
    ///
    /// Returns whether a record existed; deleting an unknown address is a
    /// no-op.
    pub fn delete(&mut self, address: Address) -> bool
    {
        let existed = self.store.delete(address);
        debug!(%address, existed, "deleting metadata");
        existed
    }

    /// Change how metadata is rendered.
    ///
    /// Only `ignore backtrace <names...>` is supported: it adds function
    /// names to the ignore-list. Returns how many names were new.
    ///
    /// ## Errors
    ///
    /// - `UnsupportedKey`: `key` is not `backtrace`
    /// - `UnsupportedFeature`: `feature` is not `ignore`
    pub fn configure<S: AsRef<str>>(&mut self, feature: &str, key: &str, values: &[S]) -> MetaResult<usize>
    {
        if key != BACKTRACE_KEY {
            return Err(MetaError::UnsupportedKey(key.to_string()));
        }
        if feature != IGNORE_FEATURE {
            return Err(MetaError::UnsupportedFeature(feature.to_string()));
        }
        let added = self.ignore.add_all(values.iter().map(|value| value.as_ref().to_string()));
        debug!(added, total = self.ignore.len(), "updated backtrace ignore list");
        Ok(added)
    }

    /// Answer a query against the current state.
    pub fn query(&self, address: Address, selection: &FieldSelection) -> QueryResult
    {
        QueryEngine::new(&self.store, &self.ignore).query(address, selection)
    }

    /// Formatter over the current state.
    pub fn formatter(&self) -> DisplayFormatter<'_>
    {
        DisplayFormatter::new(&self.store, &self.ignore)
    }

    /// Write the store and ignore-list to `path`.
    ///
    /// ## Errors
    ///
    /// `Io` or `Json` when the snapshot cannot be written.
    pub fn save_snapshot(&self, path: &Path) -> MetaResult<()>
    {
        Snapshot::capture(&self.store, &self.ignore).write_to(path)
    }

    /// Replace the store and ignore-list with the snapshot at `path`.
    ///
    /// ## Errors
    ///
    /// Any snapshot read error; the session is left unchanged.
    pub fn load_snapshot(&mut self, path: &Path) -> MetaResult<()>
    {
        let (store, ignore) = Snapshot::read_from(path)?.restore();
        self.store = store;
        self.ignore = ignore;
        Ok(())
    }
}
