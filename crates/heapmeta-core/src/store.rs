//! # Metadata Store
//!
//! Address-keyed storage of per-chunk records.
//!
//! The store holds at most one [`Record`] per [`Address`] and remembers the
//! order in which addresses were first added, so listings come out in the
//! order the operator annotated them. It does no type-specific validation:
//! palette checks and backtrace capture happen in [`crate::session`], the only
//! write path that creates colors and backtraces.
//!
//! ## Usage
//!
//! ```rust
//! use heapmeta_core::store::MetadataStore;
//! use heapmeta_core::types::{Address, FieldValue};
//!
//! let mut store = MetadataStore::new();
//! let chunk = Address::from(0x10);
//! store.put(chunk, "tag", FieldValue::Plain("service_user struct".into()));
//! assert!(store.has_field(chunk, "tag"));
//!
//! store.delete(chunk);
//! assert!(store.get(chunk).is_none());
//! ```

use indexmap::IndexMap;
use tracing::trace;

use crate::types::{Address, FieldValue, Record};

/// Mapping from chunk address to its record.
///
/// ## Thread Safety
///
/// The store is not thread-safe. Commands run one at a time on the
/// debugger's command thread, so it is owned by the session and borrowed by
/// readers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataStore
{
    records: IndexMap<Address, Record>,
}

impl MetadataStore
{
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Set `key` on the record at `address`, creating the record if needed.
    ///
    /// An existing value for the same key is replaced in place.
    pub fn put(&mut self, address: Address, key: impl Into<String>, value: FieldValue)
    {
        let key = key.into();
        trace!(%address, key = %key, "put field");
        self.records.entry(address).or_default().set(key, value);
    }

    /// Record attached to `address`, if any.
    pub fn get(&self, address: Address) -> Option<&Record>
    {
        self.records.get(&address)
    }

    /// Remove the whole record for `address`.
    ///
    /// Returns `false` (and changes nothing) when no record existed.
    pub fn delete(&mut self, address: Address) -> bool
    {
        self.records.shift_remove(&address).is_some()
    }

    /// Whether the record at `address` has a field named `key`.
    pub fn has_field(&self, address: Address, key: &str) -> bool
    {
        self.records.get(&address).is_some_and(|record| record.contains(key))
    }

    /// Union of field names across all records, in first-seen order.
    pub fn field_names(&self) -> Vec<String>
    {
        let mut names: Vec<String> = Vec::new();
        for record in self.records.values() {
            for name in record.field_names() {
                if !names.iter().any(|seen| seen == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// Records in the order their addresses were first added.
    pub fn iter(&self) -> impl Iterator<Item = (Address, &Record)>
    {
        self.records.iter().map(|(address, record)| (*address, record))
    }

    /// Number of annotated addresses.
    pub fn len(&self) -> usize
    {
        self.records.len()
    }

    /// Whether no address carries metadata.
    pub fn is_empty(&self) -> bool
    {
        self.records.is_empty()
    }

    pub(crate) fn insert_record(&mut self, address: Address, record: Record)
    {
        self.records.insert(address, record);
    }
}
