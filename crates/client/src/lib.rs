//! Revision-tracking sync client for disassembly views.
//!
//! This crate drives a [`disview_merge`] mirror from a remote changeset
//! feed. A [`SyncClient`] owns the merge state and a [`ViewBinding`]
//! implementation, and loops forever: request every revision newer than
//! the one on screen, wait (the server holds the request open until
//! something changes), merge the response, repeat.
//!
//! ## Features
//!
//! - **Long-poll loop**: one outstanding request at a time, resumed
//!   immediately after each response.
//! - **Stale-response guard**: responses belonging to an abandoned
//!   request generation are discarded, never merged.
//! - **Full reload**: callers can restart from revision zero at any
//!   time, tearing down the mirror before the snapshot lands.
//! - **Pluggable transport**: [`ChangesetSource`] abstracts the feed;
//!   [`HttpFeed`] is the HTTP implementation.
//!
//! ## Wiring
//!
//! [`SyncClient::new`] returns the client plus a [`SyncHandle`] for
//! issuing commands from elsewhere and an event stream for observing
//! applied revisions, failures, and forwarded line selections. Run the
//! client on a task; drop the handle (or call [`SyncHandle::stop`]) to
//! end it.

pub mod config;
pub mod errors;
pub mod events;
pub mod feed;
pub mod sync;

pub use config::{SyncConfig, DEFAULT_WINDOW};
pub use disview_merge::ViewBinding;
pub use errors::SyncError;
pub use events::{SyncEvent, SyncPhase};
pub use feed::{ChangesetRequest, ChangesetSource, HttpFeed};
pub use sync::{SyncClient, SyncHandle};
