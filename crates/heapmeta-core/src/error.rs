//! # Error Types
//!
//! Errors raised by the write path and the session plumbing.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! Lookup misses during a query (unknown address, unknown field, missing
//! backtrace) are *not* errors. The query engine always reports them as data,
//! so nothing in [`crate::query`] returns a [`MetaError`].

use thiserror::Error;

use crate::types::Color;

/// Main error type for metadata operations
///
/// Every variant is scoped to a single command: when a mutator returns one of
/// these, the store and the ignore-list are left exactly as they were.
///
/// ## Error Categories
///
/// 1. **Input errors**: InvalidAddress, MissingValue, InvalidFieldSpec, Usage
/// 2. **Validation errors**: UnsupportedColor, UnsupportedKey, UnsupportedFeature
/// 3. **Collaborator errors**: BacktraceUnavailable
/// 4. **Snapshot errors**: SnapshotVersion, Json
/// 5. **I/O errors**: Io
#[derive(Error, Debug)]
pub enum MetaError
{
    /// The address expression did not resolve to any address
    ///
    /// This happens when:
    /// - The expression is not a number, a known variable, or a sum of those
    /// - The debugger evaluated the expression but produced no candidates
    #[error("No valid address supplied: {0}")]
    InvalidAddress(String),

    /// A value is required for every key except `backtrace`
    #[error("A value is required for key '{0}'")]
    MissingValue(String),

    /// Color name is not part of the fixed palette
    #[error("Unsupported color '{name}'. Need one of: {}", Color::palette_names().join(", "))]
    UnsupportedColor
    {
        /// The rejected color name
        name: String,
    },

    /// `config` was given a key other than `backtrace`
    #[error("Unsupported key: {0}")]
    UnsupportedKey(String),

    /// `config` was given a feature other than `ignore`
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// A `name:param` field spec whose parameter is not an integer
    #[error("Invalid metadata spec '{0}': parameter must be an integer")]
    InvalidFieldSpec(String),

    /// The debugger could not produce a backtrace
    ///
    /// Nothing is stored when this happens.
    #[error("Backtrace unavailable: {0}")]
    BacktraceUnavailable(String),

    /// The command line could not be parsed
    ///
    /// The string carries the fully rendered usage message.
    #[error("{0}")]
    Usage(String),

    /// A snapshot was written by an incompatible version
    #[error("Unsupported snapshot version {found} (expected {expected})")]
    SnapshotVersion
    {
        /// Version found in the file
        found: u32,
        /// Version this build reads and writes
        expected: u32,
    },

    /// Snapshot (de)serialization failure
    #[error("Snapshot format error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (for snapshot files, backtrace sources, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, MetaError>`
///
/// ```rust
/// use heapmeta_core::error::MetaResult;
/// fn foo() -> MetaResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type MetaResult<T> = std::result::Result<T, MetaError>;
