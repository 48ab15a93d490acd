//! Imperative action handlers: buttons, paste, toggles, resets.

use nanokvm_core::{ActionRequest, Coordinator};

use crate::cli::{GlobalOpts, PasteArgs, PushButtonArgs, ToggleArgs};
use crate::error::CliError;

use super::util;

pub async fn push_button(
    coordinator: &Coordinator,
    args: PushButtonArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    coordinator
        .execute(ActionRequest::PushButton {
            button: args.button.into(),
            duration_ms: args.duration,
        })
        .await?;

    if !global.quiet {
        eprintln!(
            "Pressed {:?} for {}ms",
            args.button,
            args.duration
        );
    }
    Ok(())
}

pub async fn paste(
    coordinator: &Coordinator,
    args: PasteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let chars = args.text.chars().count();
    coordinator
        .execute(ActionRequest::PasteText { text: args.text })
        .await?;

    if !global.quiet {
        eprintln!("Typed {chars} characters");
    }
    Ok(())
}

pub async fn toggle(
    coordinator: &Coordinator,
    args: ToggleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Virtual-device flips need the current state to decide whether a
    // call is required at all.
    coordinator.refresh().await?;

    coordinator
        .execute(ActionRequest::SetToggle {
            toggle: args.target.into(),
            enabled: args.state.is_on(),
        })
        .await?;

    if !global.quiet {
        eprintln!("{:?} is now {:?}", args.target, args.state);
    }
    Ok(())
}

pub async fn reboot(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    if !util::confirm("Reboot the NanoKVM? The session will drop.", global.yes)? {
        return Ok(());
    }

    coordinator.execute(ActionRequest::Reboot).await?;
    if !global.quiet {
        eprintln!("Reboot initiated");
    }
    Ok(())
}

pub async fn reset_hdmi(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    // The hardware gate needs a snapshot to check against.
    coordinator.refresh().await?;
    coordinator.execute(ActionRequest::ResetHdmi).await?;

    if !global.quiet {
        eprintln!("HDMI capture chain reset");
    }
    Ok(())
}

pub async fn reset_hid(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    coordinator.execute(ActionRequest::ResetHid).await?;

    if !global.quiet {
        eprintln!("HID subsystem reset");
    }
    Ok(())
}
