// ── Core error types ──
//
// User-facing errors from nanokvm-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<nanokvm_api::Error>`
// impl translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Setup errors ─────────────────────────────────────────────────
    /// Bad credentials. Fatal to setup: the device config must change.
    #[error("Authentication failed for {host}: {message}")]
    SetupAuth { host: String, message: String },

    /// Device unreachable at setup. Retryable; the caller may try again.
    #[error("Cannot connect to device at {host}: {reason}")]
    SetupConnect { host: String, reason: String },

    // ── Refresh / availability ───────────────────────────────────────
    /// A refresh cycle failed; the previous snapshot (if any) is retained.
    #[error("Refresh failed: {message}")]
    RefreshFailed { message: String },

    /// No snapshot has ever been fetched for this device.
    #[error("Device unavailable: no status snapshot yet")]
    DeviceUnavailable,

    /// A device is not registered under the given identity.
    #[error("Device not found: {host}")]
    DeviceNotFound { host: String },

    /// Setup was attempted twice for the same identity.
    #[error("Device already registered: {host}")]
    DeviceExists { host: String },

    // ── Action errors ────────────────────────────────────────────────
    /// Rejected before any network call.
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The operation exists but not on this hardware revision.
    #[error("Operation not supported: {operation} (requires {required})")]
    Unsupported { operation: String, required: String },

    /// Structured failure reported by the device.
    #[error("Device error: {message}")]
    Api { message: String },

    // ── Local I/O (Wake-on-LAN socket) ───────────────────────────────
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nanokvm_api::Error> for CoreError {
    fn from(err: nanokvm_api::Error) -> Self {
        match err {
            nanokvm_api::Error::Authentication { message } => CoreError::Api {
                message: format!("authentication failed: {message}"),
            },
            nanokvm_api::Error::TokenExpired => CoreError::Api {
                message: "session expired -- re-authentication failed".into(),
            },
            nanokvm_api::Error::Transport(e) => CoreError::Api {
                message: e.to_string(),
            },
            nanokvm_api::Error::InvalidUrl(e) => CoreError::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },
            nanokvm_api::Error::Api { code, message } => CoreError::Api {
                message: format!("{message} (code {code})"),
            },
            nanokvm_api::Error::Deserialization { message, .. } => CoreError::Api {
                message: format!("malformed device response: {message}"),
            },
        }
    }
}
