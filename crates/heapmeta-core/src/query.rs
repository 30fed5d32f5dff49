//! # Query Engine
//!
//! Resolves a list of requested fields for one address into a uniform
//! four-part answer:
//!
//! - a **structured** list (one entry per requested field, `None` when missing)
//! - a one-line **suffix** (`" | tag | f1,f2 |"`) for table rows
//! - a verbose **epilog** (one block of text per field) for block listings
//! - the [`Colorizer`] to render the address with
//!
//! Absence is always data. An unknown address, an unknown field or a record
//! without a backtrace produce `None` entries, `N/A` cells and explanatory
//! epilog lines; the engine itself never fails.
//!
//! ## Example
//!
//! ```rust
//! use heapmeta_core::ignore::IgnoreSet;
//! use heapmeta_core::query::{FieldSelection, QueryEngine, QueryValue};
//! use heapmeta_core::store::MetadataStore;
//! use heapmeta_core::types::{Address, FieldValue};
//!
//! let mut store = MetadataStore::new();
//! store.put(Address::from(0x10), "tag", FieldValue::Plain("victim".into()));
//!
//! let ignore = IgnoreSet::new();
//! let engine = QueryEngine::new(&store, &ignore);
//! let selection = FieldSelection::parse("tag, owner").unwrap();
//! let result = engine.query(Address::from(0x10), &selection);
//!
//! assert_eq!(result.suffix, " | victim | N/A |");
//! assert_eq!(
//!     result.structured,
//!     Some(vec![Some(QueryValue::Text("victim".into())), None])
//! );
//! ```

use std::fmt::Write as _;

use serde::Serialize;
use tracing::trace;

use crate::backtrace::{BacktraceResolver, FrameLimit};
use crate::colorize::Colorizer;
use crate::error::{MetaError, MetaResult};
use crate::ignore::IgnoreSet;
use crate::store::MetadataStore;
use crate::types::{Address, FieldValue, Record, BACKTRACE_KEY, COLOR_KEY};

/// Epilog produced for an address without a record.
pub const ADDRESS_NOT_FOUND: &str = "chunk address not found in metadata database\n";

/// Selection keyword expanding to every field of a record.
pub const ALL_FIELDS: &str = "all";

/// One requested field: `name` or `name:param`.
///
/// `param` only means something for `backtrace`, where it is the maximum
/// frame count (`-1` for unlimited).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec
{
    pub name: String,
    pub param: Option<i64>,
}

impl FieldSpec
{
    /// A spec without parameter.
    pub fn new(name: impl Into<String>) -> Self
    {
        Self { name: name.into(), param: None }
    }

    /// A spec with a parameter.
    pub fn with_param(name: impl Into<String>, param: i64) -> Self
    {
        Self {
            name: name.into(),
            param: Some(param),
        }
    }

    /// Parse `name` or `name:param`, trimming surrounding whitespace.
    ///
    /// The parameter is only kept for `backtrace`; on any other field it is
    /// dropped.
    ///
    /// ## Errors
    ///
    /// `InvalidFieldSpec` when a `backtrace` parameter is not a signed
    /// integer.
    pub fn parse(spec: &str) -> MetaResult<Self>
    {
        let spec = spec.trim();
        match spec.split_once(':') {
            None => Ok(Self::new(spec)),
            Some((name, _)) if name.trim() != BACKTRACE_KEY => Ok(Self::new(name.trim())),
            Some((name, param)) => {
                let param = param
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| MetaError::InvalidFieldSpec(spec.to_string()))?;
                Ok(Self::with_param(name.trim(), param))
            }
        }
    }

    fn frame_limit(&self) -> FrameLimit
    {
        self.param.map_or(FrameLimit::FIRST, FrameLimit::from_param)
    }
}

/// Which fields a query asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelection
{
    /// Every field of the record, in insertion order, with the backtrace
    /// resolved unlimited.
    All,
    /// An explicit ordered list.
    Fields(Vec<FieldSpec>),
}

impl FieldSelection
{
    /// Parse a comma-separated list of specs, or the `all` keyword.
    ///
    /// ## Errors
    ///
    /// `InvalidFieldSpec` when a `backtrace` spec has a non-integer parameter.
    pub fn parse(list: &str) -> MetaResult<Self>
    {
        if list.trim() == ALL_FIELDS {
            return Ok(FieldSelection::All);
        }
        list.split(',').map(FieldSpec::parse).collect::<MetaResult<Vec<_>>>().map(FieldSelection::Fields)
    }

    fn expand(&self, record: &Record) -> Vec<FieldSpec>
    {
        match self {
            FieldSelection::Fields(specs) => specs.clone(),
            FieldSelection::All => record
                .field_names()
                .map(|name| {
                    if name == BACKTRACE_KEY {
                        FieldSpec::with_param(name, -1)
                    } else {
                        FieldSpec::new(name)
                    }
                })
                .collect(),
        }
    }
}

/// Structured value for one requested field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue
{
    /// A plain field's text.
    Text(String),
    /// Resolved backtrace function names.
    Frames(Vec<String>),
}

/// Answer to one query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryResult
{
    /// `None` when the address has no record; otherwise one entry per
    /// requested field except `color`.
    pub structured: Option<Vec<Option<QueryValue>>>,
    /// One-line table cells, closed with `" |"` when any cell was opened.
    pub suffix: String,
    /// Verbose multi-line text.
    pub epilog: String,
    /// How to render the address.
    pub colorizer: Colorizer,
}

/// Read-only view over the store and ignore-list that answers queries.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a>
{
    store: &'a MetadataStore,
    resolver: BacktraceResolver<'a>,
}

impl<'a> QueryEngine<'a>
{
    pub fn new(store: &'a MetadataStore, ignore: &'a IgnoreSet) -> Self
    {
        Self {
            store,
            resolver: BacktraceResolver::new(ignore),
        }
    }

    /// Resolve `selection` for `address`.
    pub fn query(&self, address: Address, selection: &FieldSelection) -> QueryResult
    {
        let Some(record) = self.store.get(address) else {
            trace!(%address, "query on unknown address");
            return QueryResult {
                structured: None,
                suffix: String::new(),
                epilog: ADDRESS_NOT_FOUND.to_string(),
                colorizer: Colorizer::Identity,
            };
        };

        let mut structured = Vec::new();
        let mut suffix = String::new();
        let mut epilog = String::new();
        let mut colorizer = Colorizer::Identity;
        let mut opened = false;

        for spec in selection.expand(record) {
            match record.get(&spec.name) {
                None if spec.name == COLOR_KEY => {}
                None => {
                    structured.push(None);
                    suffix.push_str(" | N/A");
                    let _ = writeln!(epilog, "'{}' key not found in metadata database", spec.name);
                    opened = true;
                }
                Some(FieldValue::Backtrace(backtrace)) => {
                    let frames = self.resolver.resolve_backtrace(backtrace, spec.frame_limit());
                    if frames.is_empty() {
                        suffix.push_str(" | filtered");
                    } else {
                        let _ = write!(suffix, " | {}", frames.join(","));
                    }
                    epilog.push_str(&backtrace.raw);
                    structured.push(Some(QueryValue::Frames(frames)));
                    opened = true;
                }
                Some(FieldValue::Color(color)) => {
                    colorizer = Colorizer::Palette(*color);
                }
                Some(FieldValue::Plain(value)) => {
                    let _ = write!(suffix, " | {value}");
                    let _ = writeln!(epilog, "{value}");
                    structured.push(Some(QueryValue::Text(value.clone())));
                    opened = true;
                }
            }
        }

        if opened {
            suffix.push_str(" |");
        }

        QueryResult {
            structured: Some(structured),
            suffix,
            epilog,
            colorizer,
        }
    }
}
