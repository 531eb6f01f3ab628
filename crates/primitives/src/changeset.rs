#[cfg(test)]
#[path = "tests/changeset.rs"]
mod tests;

use core::fmt::{self, Formatter};
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::addr::Addr;
use crate::area::{AreaId, AreaUpdate};
use crate::line::Line;

/// Server-assigned revision number of the viewed database.
///
/// `ZERO` means nothing has been applied yet; a client at revision `N`
/// asks for changes starting at `N + 1`.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct Revision(u64);

impl Revision {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(rev: u64) -> Self {
        Self(rev)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The `minrev` a client at this revision should request next.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<u64> for Revision {
    fn from(rev: u64) -> Self {
        Self(rev)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One incremental update from the feed, consumed immediately on receipt.
///
/// Either section may be absent; `rev` is always present and names the
/// revision the client is at once the whole changeset has been applied.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Changeset {
    pub rev: Revision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub areas: Option<Vec<AreaUpdate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<Line>>,
}

impl Changeset {
    /// Strictly parses and validates one changeset document.
    ///
    /// Anything that fails here is rejected before a single mirror
    /// mutation, so the mergers can assume their preconditions hold.
    pub fn decode(raw: &str) -> Result<Self, MalformedChangeset> {
        let changeset = serde_json::from_str::<Self>(raw)?;
        changeset.validate()?;
        Ok(changeset)
    }

    /// Checks the structural rules the wire schema cannot express:
    /// ascending non-overlapping lines, ascending unique area ids,
    /// deletes without children.
    pub fn validate(&self) -> Result<(), MalformedChangeset> {
        if let Some(lines) = &self.lines {
            validate_lines(lines)?;
        }

        if let Some(areas) = &self.areas {
            let mut seen = BTreeSet::new();
            validate_areas(areas, &mut seen)?;
        }

        Ok(())
    }
}

/// A changeset document that violates the wire contract.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MalformedChangeset {
    #[error("invalid changeset document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("line range {min:x}..{max:x} has min above max")]
    InvertedRange { min: Addr, max: Addr },
    #[error("line at {next:x} starts at or before the end ({prev_max:x}) of the line before it")]
    UnorderedLines { prev_max: Addr, next: Addr },
    #[error("area update {next} is not after its predecessor {prev}")]
    UnorderedAreas { prev: AreaId, next: AreaId },
    #[error("area id {id} appears twice in one changeset")]
    DuplicateArea { id: AreaId },
    #[error("delete of area {id} must not carry children")]
    DeleteWithChildren { id: AreaId },
}

fn validate_lines(lines: &[Line]) -> Result<(), MalformedChangeset> {
    let mut prev: Option<&Line> = None;

    for line in lines {
        if !line.range.is_well_formed() {
            return Err(MalformedChangeset::InvertedRange {
                min: line.range.min,
                max: line.range.max,
            });
        }

        if let Some(prev) = prev {
            if prev.range.max >= line.range.min {
                return Err(MalformedChangeset::UnorderedLines {
                    prev_max: prev.range.max,
                    next: line.range.min,
                });
            }
        }

        prev = Some(line);
    }

    Ok(())
}

fn validate_areas(
    updates: &[AreaUpdate],
    seen: &mut BTreeSet<AreaId>,
) -> Result<(), MalformedChangeset> {
    let mut prev: Option<&AreaId> = None;

    for update in updates {
        if let Some(prev) = prev {
            if *prev >= update.id {
                return Err(MalformedChangeset::UnorderedAreas {
                    prev: prev.clone(),
                    next: update.id.clone(),
                });
            }
        }

        if !seen.insert(update.id.clone()) {
            return Err(MalformedChangeset::DuplicateArea {
                id: update.id.clone(),
            });
        }

        if update.is_delete() {
            if update.children.is_some() {
                return Err(MalformedChangeset::DeleteWithChildren {
                    id: update.id.clone(),
                });
            }
        } else if let Some(children) = &update.children {
            validate_areas(children, seen)?;
        }

        prev = Some(&update.id);
    }

    Ok(())
}
