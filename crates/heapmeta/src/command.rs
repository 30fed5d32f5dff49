//! `ptmeta` command grammar.
//!
//! One session command per line, parsed with clap from already split words
//! (no binary name).

use clap::{ArgAction, Parser, Subcommand};
use heapmeta_core::query::FieldSelection;

/// Handle metadata associated with chunk addresses
#[derive(Parser, Debug)]
#[command(name = "ptmeta", no_binary_name = true)]
#[command(about = "Handle metadata associated with chunk addresses", long_about = None)]
#[command(after_help = "NOTE: use 'ptmeta <action> -h' to get more usage info")]
pub struct MetaCommand
{
    /// Use verbose output (multiple for more verbosity)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Save the metadata database to the snapshot file
    #[arg(short = 'S', long = "save-db", hide = true)]
    pub save: bool,

    /// Load the metadata database from the snapshot file
    #[arg(short = 'L', long = "load-db", hide = true)]
    pub load: bool,

    #[command(subcommand)]
    pub action: Option<Action>,
}

#[derive(Subcommand, Debug)]
pub enum Action
{
    /// Save metadata for a given chunk address
    #[command(after_help = "The saved metadata can then be shown with 'ptmeta list'.

E.g.
  ptmeta add mem-0x10 tag \"service_user struct\"
  ptmeta add 0xdead0030 color green
  ptmeta add 0xdead0030 backtrace")]
    Add
    {
        /// Address to link the metadata to
        address: String,
        /// Key name of the metadata (e.g. "backtrace", "color", "tag" or any name)
        key: String,
        /// Value of the metadata (required except when adding a "backtrace")
        value: Option<String>,
    },
    /// Delete metadata associated with a given chunk address
    #[command(after_help = "E.g.
  ptmeta del mem-0x10
  ptmeta del 0xdead0030")]
    Del
    {
        /// Address to remove the metadata for
        address: String,
    },
    /// List metadata for a chunk address or all chunk addresses
    #[command(after_help = "E.g.
  ptmeta list mem-0x10
  ptmeta list 0xdead0030 -M backtrace
  ptmeta list
  ptmeta list -vvvv
  ptmeta list -M \"tag, backtrace:3\"")]
    List
    {
        /// Address to list the metadata for
        address: Option<String>,
        /// Comma separated list of metadata to print ("all" for every field)
        #[arg(short = 'M', long, value_parser = parse_selection)]
        metadata: Option<FieldSelection>,
        /// Print the structured metadata as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configure general metadata behaviour
    #[command(after_help = "E.g.
  ptmeta config ignore backtrace _nl_make_l10nflist __GI___libc_free")]
    Config
    {
        /// Feature to configure (e.g. "ignore")
        feature: String,
        /// Key name of the metadata (e.g. "backtrace")
        key: String,
        /// Values associated with the key (e.g. functions to ignore in a backtrace)
        #[arg(required = true)]
        values: Vec<String>,
    },
}

fn parse_selection(list: &str) -> Result<FieldSelection, String>
{
    FieldSelection::parse(list).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests
{
    use heapmeta_core::query::FieldSpec;

    use super::*;

    fn parse(line: &str) -> MetaCommand
    {
        MetaCommand::try_parse_from(line.split_whitespace()).unwrap()
    }

    #[test]
    fn test_parse_add()
    {
        let command = parse("add 0x10 tag victim");
        assert!(matches!(
            command.action,
            Some(Action::Add { ref address, ref key, value: Some(ref value) })
                if address == "0x10" && key == "tag" && value == "victim"
        ));
    }

    #[test]
    fn test_parse_add_backtrace_without_value()
    {
        let command = parse("add 0x10 backtrace");
        assert!(matches!(command.action, Some(Action::Add { value: None, .. })));
    }

    #[test]
    fn test_verbosity_before_and_after_action()
    {
        assert_eq!(parse("-vv list").verbose, 2);
        assert_eq!(parse("list -vvv").verbose, 3);
    }

    #[test]
    fn test_parse_list_metadata()
    {
        let command = parse("list 0x10 -M tag,backtrace:3");
        let Some(Action::List { address, metadata, json }) = command.action else {
            panic!("expected list");
        };
        assert_eq!(address.as_deref(), Some("0x10"));
        assert!(!json);
        assert_eq!(
            metadata,
            Some(FieldSelection::Fields(vec![FieldSpec::new("tag"), FieldSpec::with_param("backtrace", 3)]))
        );
    }

    #[test]
    fn test_bad_metadata_spec_is_a_parse_error()
    {
        assert!(MetaCommand::try_parse_from(["list", "-M", "backtrace:lots"]).is_err());
    }

    #[test]
    fn test_config_requires_values()
    {
        assert!(MetaCommand::try_parse_from(["config", "ignore", "backtrace"]).is_err());
        let command = parse("config ignore backtrace free malloc");
        assert!(matches!(command.action, Some(Action::Config { ref values, .. }) if values.len() == 2));
    }

    #[test]
    fn test_hidden_snapshot_flags()
    {
        let command = parse("-S");
        assert!(command.save && !command.load && command.action.is_none());
        assert!(parse("--load-db").load);
    }
}
