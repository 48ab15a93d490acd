//! Command dispatch: bridges CLI args -> core actions -> output formatting.

pub mod actions;
pub mod call;
pub mod config_cmd;
pub mod status;
pub mod util;
pub mod watch;

use nanokvm_api::{NanoKvmClient, TransportConfig};
use nanokvm_core::{Coordinator, DeviceConfig};

use crate::cli::{DeviceCommand, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
///
/// Watch owns its session lifecycle (registry plus poll task); every
/// other command runs over a one-shot coordinator.
pub async fn dispatch(
    cmd: DeviceCommand,
    config: DeviceConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        DeviceCommand::Watch(args) => watch::handle(config, args, global).await,
        DeviceCommand::Status => status::handle(&connect(&config).await?, global).await,
        DeviceCommand::PushButton(args) => {
            actions::push_button(&connect(&config).await?, args, global).await
        }
        DeviceCommand::Paste(args) => actions::paste(&connect(&config).await?, args, global).await,
        DeviceCommand::Toggle(args) => {
            actions::toggle(&connect(&config).await?, args, global).await
        }
        DeviceCommand::Reboot => actions::reboot(&connect(&config).await?, global).await,
        DeviceCommand::ResetHdmi => actions::reset_hdmi(&connect(&config).await?, global).await,
        DeviceCommand::ResetHid => actions::reset_hid(&connect(&config).await?, global).await,
        DeviceCommand::Call(args) => call::handle(&connect(&config).await?, args, global).await,
    }
}

/// Open an authenticated session and wrap it in a coordinator.
///
/// Fails fast so bad credentials surface before any subcommand logic runs.
async fn connect(config: &DeviceConfig) -> Result<Coordinator, CliError> {
    let transport = TransportConfig {
        timeout: config.timeout,
    };
    let client = NanoKvmClient::new(
        &config.host,
        config.username.clone(),
        config.password.clone(),
        &transport,
    )
    .map_err(|e| CliError::ConnectionFailed {
        host: config.host.clone(),
        reason: e.to_string(),
    })?;

    client.login().await.map_err(|e| match e {
        nanokvm_api::Error::Authentication { message } => CliError::AuthFailed {
            host: config.host.clone(),
            message,
        },
        other => CliError::ConnectionFailed {
            host: config.host.clone(),
            reason: other.to_string(),
        },
    })?;

    Ok(Coordinator::new(client, config))
}
