//! # Display Formatter
//!
//! Renders query results for one address or for the whole store.
//!
//! ## Verbosity tiers
//!
//! | Tier | Layout   | Auto-discovered fields        |
//! |------|----------|-------------------------------|
//! | 0    | table    | every field except `backtrace`|
//! | 1    | table    | every field                   |
//! | 2+   | blocks   | every field                   |
//!
//! Explicitly requested fields are always honored as given. The metadata
//! listing is always followed by the backtrace ignore-list.

use std::io::{self, Write};

use crossterm::style::Stylize;
use serde::Serialize;

use crate::colorize::Colorizer;
use crate::ignore::IgnoreSet;
use crate::query::{FieldSelection, FieldSpec, QueryEngine, QueryValue};
use crate::store::MetadataStore;
use crate::types::{Address, BACKTRACE_KEY};

/// Header of the metadata section.
pub const METADATA_HEADER: &str = "Metadata database";

/// Header of the ignore-list section.
pub const IGNORE_HEADER: &str = "Function ignore list for backtraces";

/// Marker printed for an empty section.
pub const NO_DATA: &str = "N/A";

/// How much detail a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Verbosity(pub u8);

impl Verbosity
{
    /// Whether the listing uses one table row per address.
    pub const fn is_table(self) -> bool
    {
        self.0 <= 1
    }

    /// Whether auto-discovered fields include `backtrace`.
    pub const fn includes_backtrace(self) -> bool
    {
        self.0 >= 1
    }
}

/// One address's structured metadata, as printed by `list --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredEntry
{
    pub address: String,
    pub metadata: Option<Vec<Option<QueryValue>>>,
}

/// Renders listings of the store and the ignore-list.
#[derive(Debug, Clone, Copy)]
pub struct DisplayFormatter<'a>
{
    store: &'a MetadataStore,
    ignore: &'a IgnoreSet,
    engine: QueryEngine<'a>,
    color: bool,
}

impl<'a> DisplayFormatter<'a>
{
    pub fn new(store: &'a MetadataStore, ignore: &'a IgnoreSet) -> Self
    {
        Self {
            store,
            ignore,
            engine: QueryEngine::new(store, ignore),
            color: true,
        }
    }

    /// Enable or disable terminal styling of addresses and headers.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self
    {
        self.color = color;
        self
    }

    /// Fields shown when the caller did not request any.
    pub fn discovered_fields(&self, verbosity: Verbosity) -> Vec<FieldSpec>
    {
        self.store
            .field_names()
            .into_iter()
            .filter(|name| verbosity.includes_backtrace() || name != BACKTRACE_KEY)
            .map(FieldSpec::new)
            .collect()
    }

    /// Print the metadata listing followed by the ignore-list.
    ///
    /// `address` restricts the listing to one record. `selection` replaces
    /// auto-discovery of the field list. Here [`FieldSelection::All`] means
    /// the union of field names across the whole store, with backtraces
    /// resolved unlimited, so every table row shares one header. A direct
    /// [`QueryEngine::query`] with `All` expands per record instead.
    ///
    /// ## Errors
    ///
    /// Only failures of the underlying writer.
    pub fn render(
        &self,
        out: &mut dyn Write,
        address: Option<Address>,
        selection: Option<&FieldSelection>,
        verbosity: Verbosity,
    ) -> io::Result<()>
    {
        self.header(out, METADATA_HEADER)?;
        if self.store.is_empty() {
            writeln!(out, "{NO_DATA}")?;
        } else {
            let fields = match selection {
                None => self.discovered_fields(verbosity),
                Some(FieldSelection::Fields(specs)) => specs.clone(),
                Some(FieldSelection::All) => self
                    .discovered_fields(Verbosity(1))
                    .into_iter()
                    .map(|spec| {
                        if spec.name == BACKTRACE_KEY {
                            FieldSpec::with_param(spec.name, -1)
                        } else {
                            spec
                        }
                    })
                    .collect(),
            };
            if verbosity.is_table() {
                self.render_table(out, address, &fields)?;
            } else {
                self.render_blocks(out, address, &fields)?;
            }
        }
        writeln!(out)?;
        self.render_ignore_list(out)
    }

    /// Structured metadata of every matching address.
    pub fn structured(&self, address: Option<Address>, selection: &FieldSelection) -> Vec<StructuredEntry>
    {
        self.matching(address)
            .map(|chunk| StructuredEntry {
                address: chunk.to_string(),
                metadata: self.engine.query(chunk, selection).structured,
            })
            .collect()
    }

    fn render_table(&self, out: &mut dyn Write, address: Option<Address>, fields: &[FieldSpec]) -> io::Result<()>
    {
        let labels: Vec<String> = fields.iter().map(spec_label).collect();
        writeln!(out, "| address | {} |", labels.join(" | "))?;

        let selection = FieldSelection::Fields(fields.to_vec());
        for chunk in self.matching(address) {
            let result = self.engine.query(chunk, &selection);
            writeln!(out, "| {}{}", self.paint(result.colorizer, chunk), result.suffix)?;
        }
        Ok(())
    }

    fn render_blocks(&self, out: &mut dyn Write, address: Option<Address>, fields: &[FieldSpec]) -> io::Result<()>
    {
        let selection = FieldSelection::Fields(fields.to_vec());
        for chunk in self.matching(address) {
            let result = self.engine.query(chunk, &selection);
            writeln!(out, "{}:", self.paint(result.colorizer, chunk))?;
            writeln!(out, "{}", result.epilog)?;
        }
        Ok(())
    }

    fn render_ignore_list(&self, out: &mut dyn Write) -> io::Result<()>
    {
        self.header(out, IGNORE_HEADER)?;
        if self.ignore.is_empty() {
            writeln!(out, "{NO_DATA}")?;
        } else {
            for name in self.ignore.iter() {
                writeln!(out, "{name}")?;
            }
        }
        Ok(())
    }

    fn matching(&self, address: Option<Address>) -> impl Iterator<Item = Address> + 'a
    {
        self.store
            .iter()
            .map(|(chunk, _)| chunk)
            .filter(move |chunk| address.is_none_or(|wanted| wanted == *chunk))
    }

    fn paint(&self, colorizer: Colorizer, address: Address) -> String
    {
        let text = address.to_string();
        if self.color {
            colorizer.apply(&text)
        } else {
            text
        }
    }

    fn header(&self, out: &mut dyn Write, title: &str) -> io::Result<()>
    {
        if self.color {
            writeln!(out, "{}", title.bold())
        } else {
            writeln!(out, "{title}")
        }
    }
}

fn spec_label(spec: &FieldSpec) -> String
{
    match spec.param {
        Some(param) => format!("{}:{param}", spec.name),
        None => spec.name.clone(),
    }
}
