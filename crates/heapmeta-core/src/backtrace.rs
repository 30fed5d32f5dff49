//! # Backtrace Resolution
//!
//! Turns a stored [`Backtrace`] into the list of function names shown to the
//! user, and parses debugger `backtrace` output into such a list.
//!
//! Resolution drops every frame named in the [`IgnoreSet`], keeps the
//! remaining frames in their captured order, and then applies a
//! [`FrameLimit`]. It reads the stored frames and never modifies them, so
//! resolving twice with the same ignore-list yields the same answer.
//!
//! A resolved-but-empty list means either that every frame was ignored or
//! that the capture produced no frames at all. The two cases are not
//! distinguished.

use tracing::{trace, warn};

use crate::ignore::IgnoreSet;
use crate::types::{Backtrace, Record};

/// How many resolved frames to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLimit
{
    /// Keep every frame that survives the ignore-list.
    Unlimited,
    /// Keep at most this many frames.
    AtMost(usize),
}

impl FrameLimit
{
    /// Only the innermost non-ignored function.
    pub const FIRST: FrameLimit = FrameLimit::AtMost(1);

    /// Interpret the `param` of a `backtrace:<param>` field spec.
    ///
    /// Positive values cap the frame count; zero and negative values
    /// (conventionally `-1`) mean unlimited.
    pub fn from_param(param: i64) -> Self
    {
        match usize::try_from(param) {
            Ok(0) | Err(_) => FrameLimit::Unlimited,
            Ok(max) => FrameLimit::AtMost(max),
        }
    }
}

/// Resolves stored backtraces against the session's ignore-list.
#[derive(Debug, Clone, Copy)]
pub struct BacktraceResolver<'a>
{
    ignore: &'a IgnoreSet,
}

impl<'a> BacktraceResolver<'a>
{
    pub fn new(ignore: &'a IgnoreSet) -> Self
    {
        Self { ignore }
    }

    /// Resolve the record's backtrace.
    ///
    /// Returns `None` when the record has no backtrace field.
    pub fn resolve(&self, record: &Record, limit: FrameLimit) -> Option<Vec<String>>
    {
        record.backtrace().map(|backtrace| self.resolve_backtrace(backtrace, limit))
    }

    /// Innermost function that is not ignored.
    pub fn resolve_first(&self, record: &Record) -> Option<Vec<String>>
    {
        self.resolve(record, FrameLimit::FIRST)
    }

    /// Filter and truncate the frames of an already extracted backtrace.
    pub fn resolve_backtrace(&self, backtrace: &Backtrace, limit: FrameLimit) -> Vec<String>
    {
        let kept = backtrace.frames.iter().filter(|name| !self.ignore.contains(name)).cloned();
        let frames: Vec<String> = match limit {
            FrameLimit::Unlimited => kept.collect(),
            FrameLimit::AtMost(max) => kept.take(max).collect(),
        };
        trace!(captured = backtrace.frames.len(), resolved = frames.len(), ?limit, "resolved backtrace");
        frames
    }
}

/// Extract function names from gdb `backtrace` output.
///
/// Two line shapes are understood:
///
/// ```text
/// #0  __GI___libc_free (mem=0x0) at malloc.c:3096
/// #1  0x00007f834a8c8190 in _nl_make_l10nflist (l10nfile_list=...) at ../intl/l10nflist.c:237
/// ```
///
/// Anything gdb prints before the `#0` line (for example "Reading in
/// symbols" chatter with `set verbose on`) is skipped. Output that does not
/// start with a `#0` frame yields no functions.
pub fn parse_gdb_backtrace(raw: &str) -> Vec<String>
{
    let mut lines = raw.lines().skip_while(|line| line.contains("Reading in symbols")).peekable();
    if !lines.peek().is_some_and(|line| line.starts_with("#0")) {
        return Vec::new();
    }

    let mut functions = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            warn!(line, "skipping too small line in backtrace");
            continue;
        }
        if !tokens[0].starts_with('#') {
            warn!(line, "skipping non-valid line in backtrace");
            continue;
        }
        if tokens[2] == "in" {
            match tokens.get(3) {
                Some(function) => functions.push((*function).to_string()),
                None => warn!(line, "skipping frame without function name"),
            }
        } else {
            functions.push(tokens[1].to_string());
        }
    }
    functions
}

#[cfg(test)]
mod tests
{
    use super::*;

    const GDB_OUTPUT: &str = "\
#0  __GI___libc_free (mem=0x5555555592a0) at malloc.c:3096
#1  0x00007f834a8c8190 in _nl_make_l10nflist (l10nfile_list=...) at ../intl/l10nflist.c:237
#2  0x0000555555555189 in main () at test.c:12
";

    #[test]
    fn test_parse_both_frame_shapes()
    {
        assert_eq!(parse_gdb_backtrace(GDB_OUTPUT), vec!["__GI___libc_free", "_nl_make_l10nflist", "main"]);
    }

    #[test]
    fn test_parse_skips_symbol_loading_noise()
    {
        let raw = format!("Reading in symbols for malloc.c...done.\n{GDB_OUTPUT}");
        assert_eq!(parse_gdb_backtrace(&raw).len(), 3);
    }

    #[test]
    fn test_parse_rejects_output_without_frame_zero()
    {
        assert!(parse_gdb_backtrace("No stack.\n").is_empty());
        assert!(parse_gdb_backtrace("").is_empty());
    }

    #[test]
    fn test_parse_skips_malformed_lines()
    {
        let raw = "#0  free (mem=0x0) at malloc.c:1\n#1 x\nbogus line here\n#2  0x1 in main () at t.c:2\n";
        assert_eq!(parse_gdb_backtrace(raw), vec!["free", "main"]);
    }

    #[test]
    fn test_frame_limit_from_param()
    {
        assert_eq!(FrameLimit::from_param(-1), FrameLimit::Unlimited);
        assert_eq!(FrameLimit::from_param(0), FrameLimit::Unlimited);
        assert_eq!(FrameLimit::from_param(3), FrameLimit::AtMost(3));
    }
}
