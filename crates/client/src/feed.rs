//! Changeset transport.
//!
//! [`ChangesetSource`] is the seam between the sync loop and the wire;
//! [`HttpFeed`] implements it over the server's long-poll endpoint.

use async_trait::async_trait;
use disview_primitives::addr::AddressRange;
use disview_primitives::changeset::{Changeset, Revision};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::errors::SyncError;

/// Parameters of one long-poll request.
#[derive(Clone, Debug)]
pub struct ChangesetRequest {
    /// Database name on the server.
    pub db: String,
    /// Lowest revision the caller still needs. Zero asks for a snapshot.
    pub minrev: Revision,
    /// Address window of interest.
    pub window: AddressRange,
}

/// Anything that can answer a changeset request.
///
/// The server is expected to hold the request open until a revision at
/// or above `minrev` exists, so `fetch` may be pending for a long time.
/// The sync loop relies on dropping the returned future to abandon a
/// request mid-flight.
#[async_trait]
pub trait ChangesetSource {
    async fn fetch(&self, request: &ChangesetRequest) -> Result<Changeset, SyncError>;
}

/// HTTP implementation of [`ChangesetSource`].
#[derive(Clone, Debug)]
pub struct HttpFeed {
    client: Client,
    endpoint: Url,
}

impl HttpFeed {
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    /// The endpoint expects `minrev` in decimal and both window bounds
    /// in bare lower-case hex.
    fn request_url(&self, request: &ChangesetRequest) -> Url {
        let mut url = self.endpoint.clone();
        url.set_path("changeset.json");
        let _ = url
            .query_pairs_mut()
            .clear()
            .append_pair("db", &request.db)
            .append_pair("minrev", &request.minrev.to_string())
            .append_pair("minaddr", &format!("{:x}", request.window.min))
            .append_pair("maxaddr", &format!("{:x}", request.window.max));
        url
    }
}

#[async_trait]
impl ChangesetSource for HttpFeed {
    async fn fetch(&self, request: &ChangesetRequest) -> Result<Changeset, SyncError> {
        let url = self.request_url(request);

        debug!(%url, "requesting changesets");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Changeset::decode(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use disview_primitives::addr::Addr;

    use super::*;

    #[test]
    fn test_request_url_encodes_all_query_parameters() {
        let feed = HttpFeed::new("http://localhost:8080".parse().unwrap());
        let request = ChangesetRequest {
            db: "demo".to_owned(),
            minrev: Revision::new(3),
            window: AddressRange::new(Addr::new(0x0000), Addr::new(0x3FFF)),
        };

        assert_eq!(
            feed.request_url(&request).as_str(),
            "http://localhost:8080/changeset.json?db=demo&minrev=3&minaddr=0&maxaddr=3fff"
        );
    }

    #[test]
    fn test_request_url_minrev_is_decimal() {
        let feed = HttpFeed::new("http://localhost:8080".parse().unwrap());
        let request = ChangesetRequest {
            db: "demo".to_owned(),
            minrev: Revision::new(255),
            window: AddressRange::new(Addr::new(0xFF), Addr::new(0x100)),
        };

        let url = feed.request_url(&request);
        let query = url.query().unwrap();

        assert!(query.contains("minrev=255"));
        assert!(query.contains("minaddr=ff"));
        assert!(query.contains("maxaddr=100"));
    }
}
