// Shared transport configuration for building reqwest::Client instances.
//
// The NanoKVM serves plain HTTP on the LAN, so there is no TLS knob here;
// the config carries timeout and user-agent settings only.

use std::time::Duration;

use crate::error::Error;

/// Transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout. Bounds every fetch, including mid-teardown ones.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("nanokvm-rs/0.1.0")
            .build()
            .map_err(Error::Transport)
    }
}
