use disview_primitives::addr::Addr;
use disview_primitives::changeset::Revision;

use crate::errors::SyncError;

/// Where the sync loop currently is.
///
/// Published through a watch channel so observers always see the latest
/// phase without consuming anything.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SyncPhase {
    /// Between cycles; about to issue the next request.
    #[default]
    Idle,
    /// A long-poll request is outstanding.
    AwaitingResponse,
    /// A changeset arrived and is being merged.
    Applying,
    /// A cycle failed; the loop is parked until a reload.
    Failed,
}

/// Notifications emitted by the sync loop.
#[derive(Debug)]
#[non_exhaustive]
pub enum SyncEvent {
    /// A changeset was merged; the mirror now reflects `rev`.
    Applied { rev: Revision },
    /// A cycle failed and the loop parked.
    Failed { error: SyncError },
    /// A caller reported a line selection; forwarded untouched.
    LineSelected { addr: Addr },
}
