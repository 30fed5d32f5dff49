//! Function names hidden from backtrace resolution.

use std::collections::BTreeSet;

/// Ignore-list for backtrace frames.
///
/// Grows monotonically for the lifetime of a session: there is no removal.
/// Membership only affects how frames are *resolved*; stored backtraces are
/// never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet
{
    names: BTreeSet<String>,
}

impl IgnoreSet
{
    /// Create an empty ignore-list.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Union `names` into the set. Returns how many were not already present.
    pub fn add_all<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for name in names {
            if self.names.insert(name.into()) {
                added += 1;
            }
        }
        added
    }

    /// Whether `name` is ignored.
    pub fn contains(&self, name: &str) -> bool
    {
        self.names.contains(name)
    }

    /// Ignored names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str>
    {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize
    {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.names.is_empty()
    }
}
