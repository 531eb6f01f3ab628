use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::addr::{Addr, AddressRange};

/// One row of disassembly output.
///
/// Identity is `range.min` — the sole ordering and lookup key for merges.
/// On the wire a line is the positional array `[min, max, kind, text]`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Line {
    pub range: AddressRange,
    pub kind: String,
    pub text: String,
}

impl Line {
    #[must_use]
    pub fn new(range: AddressRange, kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            range,
            kind: kind.into(),
            text: text.into(),
        }
    }
}

impl Serialize for Line {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.range.min, self.range.max, &self.kind, &self.text).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Line {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (min, max, kind, text) = <(Addr, Addr, String, String)>::deserialize(deserializer)?;

        Ok(Self {
            range: AddressRange::new(min, max),
            kind,
            text,
        })
    }
}
