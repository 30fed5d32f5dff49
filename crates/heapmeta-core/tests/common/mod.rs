//! Shared fixtures for integration tests

#![allow(dead_code)]

use heapmeta_core::types::{Address, Backtrace};
use heapmeta_core::{Debugger, MetaError, MetaResult};

/// gdb output for a three-frame stack.
pub const GDB_BACKTRACE: &str = "\
#0  __GI___libc_free (mem=0x5555555592a0) at malloc.c:3096
#1  0x00007ffff7e4a190 in _nl_make_l10nflist (l10nfile_list=...) at ../intl/l10nflist.c:237
#2  0x0000555555555189 in main () at test.c:12
";

/// Scripted debugger: addresses are plain hex, backtraces come from a queue.
#[derive(Default)]
pub struct FakeDebugger
{
    pub backtraces: Vec<Backtrace>,
    pub captures: usize,
}

impl FakeDebugger
{
    pub fn with_frames(frames: &[&str]) -> Self
    {
        let raw = frames.iter().enumerate().map(|(i, f)| format!("#{i}  {f} ()\n")).collect::<String>();
        Self {
            backtraces: vec![Backtrace::new(raw, frames.iter().map(|f| (*f).to_string()).collect())],
            captures: 0,
        }
    }
}

impl Debugger for FakeDebugger
{
    fn resolve_address_expression(&mut self, expression: &str) -> MetaResult<Vec<Address>>
    {
        let hex = expression.trim_start_matches("0x");
        u64::from_str_radix(hex, 16)
            .map(|value| vec![Address::from(value)])
            .map_err(|_| MetaError::InvalidAddress(expression.to_string()))
    }

    fn capture_backtrace(&mut self) -> MetaResult<Backtrace>
    {
        self.captures += 1;
        if self.backtraces.is_empty() {
            return Err(MetaError::BacktraceUnavailable("nothing scripted".to_string()));
        }
        Ok(self.backtraces.remove(0))
    }
}
