//! Per-address record and its field values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Color;

/// Field name reserved for the display color.
pub const COLOR_KEY: &str = "color";

/// Field name reserved for captured backtraces.
pub const BACKTRACE_KEY: &str = "backtrace";

/// A call stack captured at `add` time.
///
/// `raw` is kept verbatim and is never filtered. `frames` is derived from the
/// same capture and is only ever read through
/// [`BacktraceResolver`](crate::backtrace::BacktraceResolver). Re-capturing
/// replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backtrace
{
    /// Debugger output exactly as captured.
    pub raw: String,
    /// Function names, innermost frame first.
    pub frames: Vec<String>,
}

impl Backtrace
{
    /// Create a backtrace from its raw text and derived function names.
    pub fn new(raw: impl Into<String>, frames: Vec<String>) -> Self
    {
        Self { raw: raw.into(), frames }
    }
}

/// Value stored under a field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldValue
{
    /// Arbitrary user text.
    Plain(String),
    /// Palette entry used to render the address.
    Color(Color),
    /// Captured call stack.
    Backtrace(Backtrace),
}

/// Ordered field map attached to one chunk address.
///
/// Fields keep their first-insertion position; overwriting a field keeps
/// its slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record
{
    fields: IndexMap<String, FieldValue>,
}

impl Record
{
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Set or replace a field, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) -> Option<FieldValue>
    {
        self.fields.insert(key.into(), value)
    }

    /// Look up a field by name.
    pub fn get(&self, key: &str) -> Option<&FieldValue>
    {
        self.fields.get(key)
    }

    /// Whether the record has a field with this name.
    pub fn contains(&self, key: &str) -> bool
    {
        self.fields.contains_key(key)
    }

    /// The captured backtrace, if one was stored.
    pub fn backtrace(&self) -> Option<&Backtrace>
    {
        match self.fields.get(BACKTRACE_KEY) {
            Some(FieldValue::Backtrace(backtrace)) => Some(backtrace),
            _ => None,
        }
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str>
    {
        self.fields.keys().map(String::as_str)
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)>
    {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of fields.
    pub fn len(&self) -> usize
    {
        self.fields.len()
    }

    /// Whether the record holds no fields.
    pub fn is_empty(&self) -> bool
    {
        self.fields.is_empty()
    }
}
