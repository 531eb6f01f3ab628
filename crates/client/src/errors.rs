use disview_primitives::changeset::MalformedChangeset;
use thiserror::Error;

/// Reasons one sync cycle can fail.
///
/// Any of these parks the client in `SyncPhase::Failed`; it stays there
/// until a reload command restarts the loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    /// The request never produced an HTTP response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-success status. The body is kept
    /// verbatim so callers can surface the server's own diagnostic page.
    #[error("server returned status {status}")]
    Server { status: u16, body: String },

    /// The response body did not decode as a valid changeset.
    #[error("malformed changeset: {0}")]
    Malformed(#[from] MalformedChangeset),
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
