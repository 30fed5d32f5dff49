//! # Debugger Collaborator
//!
//! The interface heapmeta needs from the host debugger.
//!
//! Only two services are consumed:
//!
//! - turning a user-typed address expression into numeric chunk addresses
//! - capturing the current call stack
//!
//! ## Hosts
//!
//! The metadata layer runs inside whatever debugger hosts it (gdb, a ptrace
//! frontend, a replay of saved output). Each host implements [`Debugger`];
//! tests script their own.
//!
//! [`StandaloneDebugger`] is the implementation used when no live process is
//! attached: it evaluates simple arithmetic over literals and named
//! variables, and reads gdb `backtrace` output from a file or fixed text.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::backtrace::parse_gdb_backtrace;
use crate::error::{MetaError, MetaResult};
use crate::types::{Address, Backtrace};

/// Services consumed from the host debugger
///
/// ## Thread Safety
///
/// Implementations are driven from the debugger's single command thread and
/// need not be thread-safe.
pub trait Debugger
{
    /// Evaluate an address expression.
    ///
    /// Returns every candidate address the expression resolves to, in the
    /// debugger's preference order.
    ///
    /// ## Errors
    ///
    /// - `InvalidAddress`: the expression cannot be evaluated
    fn resolve_address_expression(&mut self, expression: &str) -> MetaResult<Vec<Address>>;

    /// Capture the current call stack.
    ///
    /// ## Errors
    ///
    /// - `BacktraceUnavailable`: no stack can be captured right now
    /// - `Io`: the capture source could not be read
    fn capture_backtrace(&mut self) -> MetaResult<Backtrace>;
}

/// Resolve `expression` and keep only the first candidate.
///
/// Extra candidates are discarded with a warning; no candidate at all is an
/// `InvalidAddress` error.
///
/// ## Errors
///
/// Whatever the debugger reports, or `InvalidAddress` for an empty result.
pub fn resolve_first(debugger: &mut dyn Debugger, expression: &str) -> MetaResult<Address>
{
    let candidates = debugger.resolve_address_expression(expression)?;
    if candidates.len() > 1 {
        warn!(
            expression,
            kept = %candidates[0],
            discarded = candidates.len() - 1,
            "address expression is ambiguous, using the first candidate"
        );
    }
    candidates
        .first()
        .copied()
        .ok_or_else(|| MetaError::InvalidAddress(expression.to_string()))
}

/// Where [`StandaloneDebugger`] reads backtraces from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BacktraceSource
{
    /// No source configured: every capture fails.
    #[default]
    None,
    /// A file holding gdb `backtrace` output, re-read on every capture.
    File(PathBuf),
    /// Fixed gdb `backtrace` output.
    Text(String),
}

/// Debugger used when heapmeta runs without a live debugger.
///
/// ## Address expressions
///
/// A sum or difference of terms, where each term is a hexadecimal literal
/// (`0xdead0030`), a decimal literal (`4096`), or a variable name with or
/// without a leading `$`:
///
/// ```rust
/// use heapmeta_core::debugger::{Debugger, StandaloneDebugger};
/// use heapmeta_core::types::Address;
///
/// let mut debugger = StandaloneDebugger::new();
/// debugger.set_variable("mem", Address::from(0x5555_0000));
/// let resolved = debugger.resolve_address_expression("$mem - 0x10").unwrap();
/// assert_eq!(resolved, vec![Address::from(0x5554_fff0)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StandaloneDebugger
{
    variables: HashMap<String, Address>,
    source: BacktraceSource,
}

impl StandaloneDebugger
{
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Use `source` for subsequent backtrace captures.
    #[must_use]
    pub fn with_backtrace_source(mut self, source: BacktraceSource) -> Self
    {
        self.source = source;
        self
    }

    /// Define (or redefine) a variable usable in address expressions.
    pub fn set_variable(&mut self, name: impl Into<String>, value: Address)
    {
        let name = name.into();
        let name = name.strip_prefix('$').map(str::to_string).unwrap_or(name);
        self.variables.insert(name, value);
    }

    fn term(&self, term: &str, expression: &str) -> MetaResult<u64>
    {
        let invalid = || MetaError::InvalidAddress(expression.to_string());
        if term.is_empty() {
            return Err(invalid());
        }
        if let Some(hex) = term.strip_prefix("0x").or_else(|| term.strip_prefix("0X")) {
            return u64::from_str_radix(hex, 16).map_err(|_| invalid());
        }
        if term.bytes().all(|b| b.is_ascii_digit()) {
            return term.parse::<u64>().map_err(|_| invalid());
        }
        let name = term.strip_prefix('$').unwrap_or(term);
        self.variables.get(name).map(|address| address.value()).ok_or_else(invalid)
    }

    fn evaluate(&self, expression: &str) -> MetaResult<Address>
    {
        let invalid = || MetaError::InvalidAddress(expression.to_string());
        let mut total: Option<Address> = None;
        let mut negate = false;
        let mut current = String::new();

        let apply = |total: &mut Option<Address>, term: &str, negate: bool| -> MetaResult<()> {
            let value = self.term(term.trim(), expression)?;
            *total = match (*total, negate) {
                (None, false) => Some(Address::from(value)),
                (None, true) => return Err(invalid()),
                (Some(acc), false) => Some(acc.checked_add(value).ok_or_else(invalid)?),
                (Some(acc), true) => Some(acc.checked_sub(value).ok_or_else(invalid)?),
            };
            Ok(())
        };

        for c in expression.chars() {
            match c {
                '+' | '-' => {
                    apply(&mut total, &current, negate)?;
                    current.clear();
                    negate = c == '-';
                }
                _ => current.push(c),
            }
        }
        apply(&mut total, &current, negate)?;
        total.ok_or_else(invalid)
    }
}

impl Debugger for StandaloneDebugger
{
    fn resolve_address_expression(&mut self, expression: &str) -> MetaResult<Vec<Address>>
    {
        let address = self.evaluate(expression.trim())?;
        debug!(expression, %address, "resolved address expression");
        Ok(vec![address])
    }

    fn capture_backtrace(&mut self) -> MetaResult<Backtrace>
    {
        let raw = match &self.source {
            BacktraceSource::None => {
                return Err(MetaError::BacktraceUnavailable(
                    "no live process; configure a backtrace file".to_string(),
                ))
            }
            BacktraceSource::File(path) => fs::read_to_string(path)?,
            BacktraceSource::Text(text) => text.clone(),
        };
        let frames = parse_gdb_backtrace(&raw);
        debug!(frames = frames.len(), "captured backtrace");
        Ok(Backtrace::new(raw, frames))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_resolve_literals()
    {
        let mut debugger = StandaloneDebugger::new();
        assert_eq!(debugger.resolve_address_expression("0xdead0030").unwrap(), vec![Address::from(0xdead_0030)]);
        assert_eq!(debugger.resolve_address_expression("4096").unwrap(), vec![Address::from(4096)]);
        assert_eq!(debugger.resolve_address_expression(" 0x10 + 16 ").unwrap(), vec![Address::from(0x20)]);
    }

    #[test]
    fn test_resolve_variables()
    {
        let mut debugger = StandaloneDebugger::new();
        debugger.set_variable("$mem", Address::from(0x1000));
        assert_eq!(debugger.resolve_address_expression("mem-0x10").unwrap(), vec![Address::from(0xff0)]);
        assert_eq!(debugger.resolve_address_expression("$mem").unwrap(), vec![Address::from(0x1000)]);
    }

    #[test]
    fn test_resolve_rejects_garbage()
    {
        let mut debugger = StandaloneDebugger::new();
        for expression in ["", "nope", "0xzz", "-0x10", "0x10+", "0x0-1"] {
            assert!(
                matches!(debugger.resolve_address_expression(expression), Err(MetaError::InvalidAddress(_))),
                "{expression} should be rejected"
            );
        }
    }

    #[test]
    fn test_capture_without_source_fails()
    {
        let mut debugger = StandaloneDebugger::new();
        assert!(matches!(debugger.capture_backtrace(), Err(MetaError::BacktraceUnavailable(_))));
    }

    #[test]
    fn test_capture_from_text()
    {
        let raw = "#0  free (mem=0x0) at malloc.c:1\n#1  0x1 in main () at t.c:2\n";
        let mut debugger = StandaloneDebugger::new().with_backtrace_source(BacktraceSource::Text(raw.to_string()));
        let backtrace = debugger.capture_backtrace().unwrap();
        assert_eq!(backtrace.raw, raw);
        assert_eq!(backtrace.frames, vec!["free", "main"]);
    }

    struct Ambiguous;

    impl Debugger for Ambiguous
    {
        fn resolve_address_expression(&mut self, _expression: &str) -> MetaResult<Vec<Address>>
        {
            Ok(vec![Address::from(0x10), Address::from(0x20)])
        }

        fn capture_backtrace(&mut self) -> MetaResult<Backtrace>
        {
            Ok(Backtrace::new("", Vec::new()))
        }
    }

    #[test]
    fn test_resolve_first_keeps_first_candidate()
    {
        assert_eq!(resolve_first(&mut Ambiguous, "x").unwrap(), Address::from(0x10));
    }
}
