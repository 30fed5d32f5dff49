//! # Types
//!
//! Plain data types shared by the store, the resolver and the query engine.
//!
//! These types carry no behaviour beyond construction and lookup, so every
//! other module can depend on them without depending on each other.

pub mod address;
pub mod color;
pub mod record;

// Re-export all public types
pub use address::Address;
pub use color::Color;
pub use record::{Backtrace, FieldValue, Record, BACKTRACE_KEY, COLOR_KEY};
