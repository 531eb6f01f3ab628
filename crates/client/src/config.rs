//! Client configuration.

use disview_primitives::addr::{Addr, AddressRange};
use serde::{Deserialize, Serialize};
use url::Url;

/// Address window requested when none is configured.
pub const DEFAULT_WINDOW: AddressRange =
    AddressRange::new(Addr::new(0x0000), Addr::new(0x3FFF));

/// Settings for one sync session against one database.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[non_exhaustive]
pub struct SyncConfig {
    /// Base URL of the changeset server.
    pub endpoint: Url,
    /// Database name passed through on every request.
    pub db: String,
    /// Address window the client subscribes to.
    #[serde(default = "default_window")]
    pub window: AddressRange,
}

impl SyncConfig {
    #[must_use]
    pub fn new(endpoint: Url, db: impl Into<String>) -> Self {
        Self {
            endpoint,
            db: db.into(),
            window: DEFAULT_WINDOW,
        }
    }

    #[must_use]
    pub const fn with_window(mut self, window: AddressRange) -> Self {
        self.window = window;
        self
    }
}

const fn default_window() -> AddressRange {
    DEFAULT_WINDOW
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_to_standard_window() {
        let config = SyncConfig::new("http://localhost:8080".parse().unwrap(), "demo");

        assert_eq!(config.window, DEFAULT_WINDOW);
        assert_eq!(config.window.min.value(), 0x0000);
        assert_eq!(config.window.max.value(), 0x3FFF);
    }

    #[test]
    fn test_config_window_override() {
        let window = AddressRange::new(Addr::new(0x8000), Addr::new(0xFFFF));
        let config = SyncConfig::new("http://localhost:8080".parse().unwrap(), "demo")
            .with_window(window);

        assert_eq!(config.window, window);
    }

    #[test]
    fn test_config_deserializes_without_window() {
        let config: SyncConfig = serde_json::from_str(
            r#"{"endpoint": "http://localhost:8080/", "db": "demo"}"#,
        )
        .unwrap();

        assert_eq!(config.db, "demo");
        assert_eq!(config.window, DEFAULT_WINDOW);
    }
}
