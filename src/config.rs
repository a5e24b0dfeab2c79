//! Configuration types for the store.

use crate::error::{MonqError, Result};

/// Endpoint used when no configuration is given.
pub const DEFAULT_ENDPOINT: &str = "localhost:27017";

/// Configuration for a backing-store connection.
///
/// The endpoint is an explicit value passed at construction; there is no
/// process-wide connection state. Stores built from separate configs are
/// fully independent, which is what tests rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Backing-store hostname.
    pub host: String,
    /// Backing-store port.
    pub port: u16,
}

impl StoreConfig {
    /// Create a new StoreConfig from host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse a `host:port` endpoint descriptor.
    ///
    /// A descriptor that is not `host:port` with a valid port number is
    /// rejected here, at configuration time.
    pub fn parse(endpoint: &str) -> Result<Self> {
        let (host, port) = endpoint
            .rsplit_once(':')
            .ok_or_else(|| MonqError::Config(format!("Invalid endpoint '{}'", endpoint)))?;

        if host.is_empty() {
            return Err(MonqError::Config(format!(
                "Invalid endpoint '{}': missing host",
                endpoint
            )));
        }

        let port: u16 = port.parse().map_err(|_| {
            MonqError::Config(format!("Invalid endpoint '{}': bad port '{}'", endpoint, port))
        })?;

        Ok(Self::new(host, port))
    }

    /// The `host:port` address of the backing store.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 27017,
        }
    }
}

impl std::fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
