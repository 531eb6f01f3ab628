#[cfg(test)]
#[path = "tests/addr.rs"]
mod tests;

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One location in the disassembly address space.
///
/// Addresses are plain integers on the wire. Textually an address is bare
/// hexadecimal with no prefix, which is also how the feed URL encodes it.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct Addr(u64);

impl Addr {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Fixed-width upper-case hex, keeping only the low `digits` nibbles.
    ///
    /// Callers ask for the width their column renders; a value wider than
    /// the column is truncated to its low digits, so `0x12345` at width 4
    /// formats as `"2345"`. Widths are clamped to 1..=16.
    #[must_use]
    pub fn to_fixed_hex(self, digits: usize) -> String {
        let digits = digits.clamp(1, 16);
        let masked = if digits == 16 {
            self.0
        } else {
            self.0 & ((1_u64 << (digits * 4)) - 1)
        };
        format!("{masked:0digits$X}")
    }
}

impl From<u64> for Addr {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Addr> for u64 {
    fn from(addr: Addr) -> Self {
        addr.0
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl FromStr for Addr {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u64::from_str_radix(s, 16).map(Self)
    }
}

/// A closed interval `[min, max]` of addresses.
///
/// Line identity is `min`; `max` only matters for overlap eviction. A valid
/// update batch keeps its ranges pairwise non-overlapping and strictly
/// ascending by `min`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct AddressRange {
    pub min: Addr,
    pub max: Addr,
}

impl AddressRange {
    #[must_use]
    pub const fn new(min: Addr, max: Addr) -> Self {
        Self { min, max }
    }

    /// Whether the interval is well-formed (`min <= max`).
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.min <= self.max
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}..{:x}", self.min, self.max)
    }
}
