//! Watch mode: register the device, poll it, and stream state changes
//! until interrupted.

use std::time::Duration;

use chrono::Utc;
use owo_colors::OwoColorize;

use nanokvm_core::{DeviceConfig, DeviceRegistry};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    mut config: DeviceConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    config.poll_interval = Duration::from_secs(args.interval.max(1));

    let registry = DeviceRegistry::new();
    let coordinator = registry.setup(config).await?;
    let mut rx = coordinator.subscribe();

    if !global.quiet {
        eprintln!(
            "Watching {} every {}s (ctrl-c to stop)",
            coordinator.host(),
            args.interval.max(1)
        );
    }

    let color = output::should_color(&global.color);

    // The setup refresh already published a state; print it before
    // waiting for the next change.
    print_update(&coordinator.state(), global, color);
    rx.mark_unchanged();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                print_update(&state, global, color);
            }
        }
    }

    registry.teardown_all().await;
    Ok(())
}

fn print_update(state: &nanokvm_core::CoordinatorState, global: &GlobalOpts, color: bool) {
    let stamp = Utc::now().format("%H:%M:%S");

    if let Some(ref error) = state.last_error {
        let line = format!("[{stamp}] refresh failed ({} in a row): {error}",
            state.consecutive_failures);
        if color {
            eprintln!("{}", line.red());
        } else {
            eprintln!("{line}");
        }
        return;
    }

    if !global.quiet {
        println!("[{stamp}]");
    }
    let rendered = output::render_status(state, &global.output, color);
    output::print_output(&rendered, global.quiet);
}
