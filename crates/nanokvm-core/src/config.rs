// ── Runtime device configuration ──
//
// Describes *how* to reach one NanoKVM. Carries credential data and
// polling tuning, but never touches disk -- the CLI (or any other host)
// constructs a `DeviceConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;

/// Configuration for one NanoKVM device.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Hostname or IP (scheme optional; plain HTTP assumed).
    pub host: String,
    pub username: String,
    pub password: SecretString,
    /// Base polling interval. Widened by backoff on repeated failures.
    pub poll_interval: Duration,
    /// Per-request HTTP timeout. Also bounds the whole fetch at teardown.
    pub timeout: Duration,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: "nanokvm.local".into(),
            username: "admin".into(),
            password: SecretString::from("admin".to_owned()),
            poll_interval: Duration::from_secs(30),
            timeout: Duration::from_secs(10),
        }
    }
}
