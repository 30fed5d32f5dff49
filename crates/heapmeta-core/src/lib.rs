//! # heapmeta-core
//!
//! Annotation layer for heap inspection sessions.
//!
//! This crate lets an operator attach named facts to chunk addresses found
//! while debugging, and query them back:
//! - Free-form tags (any key, any text)
//! - A display color from a fixed palette
//! - Call stacks captured at annotation time, filtered through an ignore-list
//!
//! ## Layout
//!
//! - [`store`]: address → record mapping
//! - [`ignore`]: function names hidden from backtraces
//! - [`backtrace`]: frame filtering/truncation and gdb output parsing
//! - [`query`]: per-address field resolution (structured, one-line, verbose)
//! - [`display`]: table and block listings
//! - [`session`]: session state and the add/del/config write path
//! - [`snapshot`]: development-only save/restore
//! - [`debugger`]: the host debugger collaborator
//!
//! Lookups never fail: missing addresses and fields come back as data. Only
//! the write path reports errors, and it validates before mutating.

pub mod backtrace;
pub mod colorize;
pub mod debugger;
pub mod display;
pub mod error;
pub mod ignore;
pub mod query;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod types;

pub use debugger::Debugger;
// Re-export commonly used types
pub use error::{MetaError, MetaResult};
pub use session::Session;
pub use types::{Address, Color};
