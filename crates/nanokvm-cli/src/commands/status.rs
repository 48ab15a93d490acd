//! One-shot status: refresh the snapshot and render the entity set.

use nanokvm_core::Coordinator;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    coordinator
        .refresh()
        .await
        .map_err(|e| map_refresh_error(e, coordinator.host()))?;

    let state = coordinator.state();
    let color = output::should_color(&global.color);
    let rendered = output::render_status(&state, &global.output, color);
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn map_refresh_error(err: nanokvm_core::CoreError, host: &str) -> CliError {
    match err {
        nanokvm_core::CoreError::RefreshFailed { message } => CliError::ConnectionFailed {
            host: host.into(),
            reason: message,
        },
        nanokvm_core::CoreError::DeviceUnavailable => CliError::DeviceUnavailable {
            host: host.into(),
        },
        other => other.into(),
    }
}
