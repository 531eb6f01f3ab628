//! Shared data model for the disview sync core.
//!
//! Defines the addressable primitives (addresses, ranges, lines, area
//! updates) and the changeset envelope they travel in, together with the
//! strict decoder that rejects malformed feed payloads before they can
//! reach a mirror.

pub mod addr;
pub mod area;
pub mod changeset;
pub mod line;
