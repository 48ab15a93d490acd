//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use nanokvm_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach NanoKVM at {host}")]
    #[diagnostic(
        code(nanokvm::connection_failed),
        help(
            "Check that the device is powered and on the network.\n\
             Host: {host}\n\
             Try: ping {host}"
        )
    )]
    ConnectionFailed { host: String, reason: String },

    #[error("Device at {host} has not produced a snapshot yet")]
    #[diagnostic(
        code(nanokvm::unavailable),
        help("The device may be mid-boot. Retry in a few seconds.")
    )]
    DeviceUnavailable { host: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed for {host}")]
    #[diagnostic(
        code(nanokvm::auth_failed),
        help(
            "Verify the username and password for this device.\n\
             Update them with: nanokvm config init"
        )
    )]
    AuthFailed { host: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(nanokvm::no_credentials),
        help(
            "Configure credentials with: nanokvm config init\n\
             Or set the NANOKVM_USERNAME and NANOKVM_PASSWORD environment variables."
        )
    )]
    NoCredentials { profile: String },

    // ── Unsupported ──────────────────────────────────────────────────

    #[error("Operation '{operation}' is not supported by this device")]
    #[diagnostic(
        code(nanokvm::unsupported),
        help("This command requires {required}.")
    )]
    Unsupported { operation: String, required: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(nanokvm::validation))]
    Validation { field: String, reason: String },

    // ── Device / API ─────────────────────────────────────────────────

    #[error("Device error: {message}")]
    #[diagnostic(code(nanokvm::api_error))]
    ApiError { message: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(nanokvm::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: nanokvm config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No device configured")]
    #[diagnostic(
        code(nanokvm::no_config),
        help(
            "Pass --host, or create a config file with: nanokvm config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Profile '{name}' already exists")]
    #[diagnostic(code(nanokvm::profile_exists))]
    ProfileExists { name: String },

    #[error(transparent)]
    #[diagnostic(code(nanokvm::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(nanokvm::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(nanokvm::json), help("Check the --params value and try again."))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::DeviceUnavailable { .. } => {
                exit_code::CONNECTION
            }
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::ProfileExists { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } | Self::Json(_) => {
                exit_code::USAGE
            }
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SetupAuth { host, message } => CliError::AuthFailed { host, message },

            CoreError::SetupConnect { host, reason } => {
                CliError::ConnectionFailed { host, reason }
            }

            CoreError::RefreshFailed { message } => CliError::ConnectionFailed {
                host: "(device)".into(),
                reason: message,
            },

            CoreError::DeviceUnavailable => CliError::DeviceUnavailable {
                host: "(device)".into(),
            },

            CoreError::DeviceNotFound { host } | CoreError::DeviceExists { host } => {
                CliError::ConnectionFailed {
                    host,
                    reason: "device registry state mismatch".into(),
                }
            }

            CoreError::Validation { field, reason } => CliError::Validation { field, reason },

            CoreError::Unsupported {
                operation,
                required,
            } => CliError::Unsupported {
                operation,
                required,
            },

            CoreError::Api { message } => CliError::ApiError { message },

            CoreError::Io(e) => CliError::Io(e),
        }
    }
}
