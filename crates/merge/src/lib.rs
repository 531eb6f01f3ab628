//! Ordered merge engines for the viewer's two mirrored structures.
//!
//! This crate is pure algorithm: it owns the client-side mirrors (the flat
//! row table and the area tree), patches them from decoded changeset
//! sections, and pushes every rendering side effect through the
//! [`ViewBinding`] trait. It knows nothing about transport or any concrete
//! UI, which keeps it easy to test and reuse.
//!
//! ## Core Concepts
//!
//! - **[`RowTable`]**: range-keyed line mirror, patched in one ascending sweep
//! - **[`AreaTree`]**: id-keyed ordered area mirror, patched recursively
//! - **[`ViewBinding`]**: trait for rendering side effects (dependency injection)
//!
//! Both mergers assume their input batches are well-formed (ascending,
//! non-overlapping, unique); the decode layer upstream rejects everything
//! else before a merger ever sees it.

pub mod binding;
pub mod table;
pub mod tree;

#[cfg(any(test, feature = "testing"))]
pub mod testing;


pub use binding::ViewBinding;
pub use table::RowTable;
pub use tree::{AreaEntry, AreaTree};
