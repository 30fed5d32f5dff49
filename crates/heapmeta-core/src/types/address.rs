//! Chunk address type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Strongly typed chunk address
///
/// This wrapper around `u64` is the primary key of the metadata store. It
/// prevents accidentally mixing addresses with other `u64` values (like frame
/// limits or counts) and gives every listing the same `0x...` rendering.
///
/// Addresses are always the *normalized* chunk address handed back by the
/// debugger; the store never interprets them.
///
/// ## Example
///
/// ```rust
/// use heapmeta_core::types::Address;
///
/// let addr = Address::from(0xdead_0030);
/// assert_eq!(addr.value(), 0xdead_0030);
/// assert_eq!(addr.to_string(), "0xdead0030");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(u64);

impl Address
{
    /// Create a new address from a `u64` value
    ///
    /// This is equivalent to `Address::from(value)` but can be used in const contexts.
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Add an offset to this address, checking for overflow
    ///
    /// ## Example
    ///
    /// ```rust
    /// use heapmeta_core::types::Address;
    ///
    /// let addr = Address::from(0x1000);
    /// assert_eq!(addr.checked_add(0x100), Some(Address::from(0x1100)));
    /// assert_eq!(addr.checked_add(u64::MAX), None);
    /// ```
    pub fn checked_add(self, offset: u64) -> Option<Self>
    {
        self.0.checked_add(offset).map(Address)
    }

    /// Subtract an offset from this address, checking for underflow
    ///
    /// ## Example
    ///
    /// ```rust
    /// use heapmeta_core::types::Address;
    ///
    /// let addr = Address::from(0x1000);
    /// assert_eq!(addr.checked_sub(0x10), Some(Address::from(0xff0)));
    /// assert_eq!(addr.checked_sub(u64::MAX), None);
    /// ```
    pub fn checked_sub(self, offset: u64) -> Option<Self>
    {
        self.0.checked_sub(offset).map(Address)
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:x}", self.0)
    }
}

impl fmt::LowerHex for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
