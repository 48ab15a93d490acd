// ── Action requests and dispatch ──
//
// Every imperative call flows through a validated `ActionRequest`.
// Validation runs before any network I/O; routing forwards the request
// to the device client (or the local WoL socket) and nothing else --
// the post-action refresh lives in `Coordinator::execute`.

use std::str::FromStr;

use nanokvm_api::{GpioType, HardwareVersion, VirtualDevice};

use crate::coordinator::Coordinator;
use crate::error::CoreError;
use crate::wol::{self, MacAddress};

/// Allowed hold duration for a front-panel button press.
pub const BUTTON_DURATION_MS: std::ops::RangeInclusive<u64> = 100..=5000;

/// Default hold duration when the caller gives none.
pub const DEFAULT_BUTTON_DURATION_MS: u64 = 100;

/// Front-panel button selectable by callers.
///
/// Host-facing vocabulary; translated to the wire-level [`GpioType`]
/// only at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonType {
    Power,
    Reset,
}

impl FromStr for ButtonType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "power" => Ok(Self::Power),
            "reset" => Ok(Self::Reset),
            other => Err(CoreError::validation(
                "button_type",
                format!("must be \"power\" or \"reset\", got \"{other}\""),
            )),
        }
    }
}

impl From<ButtonType> for GpioType {
    fn from(b: ButtonType) -> Self {
        match b {
            ButtonType::Power => GpioType::Power,
            ButtonType::Reset => GpioType::Reset,
        }
    }
}

/// Device feature controllable through a boolean toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleKind {
    Ssh,
    Mdns,
    VirtualNetwork,
    VirtualDisk,
}

/// One validated imperative call against a device.
///
/// Value object: constructed, validated, dispatched, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    PushButton { button: ButtonType, duration_ms: u64 },
    SetToggle { toggle: ToggleKind, enabled: bool },
    PasteText { text: String },
    Reboot,
    ResetHdmi,
    ResetHid,
    WakeOnLan { mac: MacAddress },
}

impl ActionRequest {
    /// Check all kind-specific parameters. Runs before any network call;
    /// a failure here guarantees the device was never contacted.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::PushButton { duration_ms, .. } => {
                if !BUTTON_DURATION_MS.contains(duration_ms) {
                    return Err(CoreError::validation(
                        "duration",
                        format!(
                            "must be between {} and {} ms, got {duration_ms}",
                            BUTTON_DURATION_MS.start(),
                            BUTTON_DURATION_MS.end()
                        ),
                    ));
                }
                Ok(())
            }
            Self::PasteText { text } => {
                if text.is_empty() {
                    return Err(CoreError::validation("text", "must not be empty"));
                }
                if let Some(c) = text.chars().find(|c| !matches!(c, ' '..='~')) {
                    return Err(CoreError::validation(
                        "text",
                        format!("contains non-printable-ASCII character {c:?}"),
                    ));
                }
                Ok(())
            }
            // MAC parsing already enforced the hex-pair pattern.
            Self::SetToggle { .. }
            | Self::Reboot
            | Self::ResetHdmi
            | Self::ResetHid
            | Self::WakeOnLan { .. } => Ok(()),
        }
    }
}

/// Forward a validated request to the device client (or the local
/// Wake-on-LAN socket). Device failures surface unchanged; coordinator
/// state is never touched here.
pub(crate) async fn route_action(
    coordinator: &Coordinator,
    request: &ActionRequest,
) -> Result<(), CoreError> {
    let client = coordinator.client();

    match request {
        ActionRequest::PushButton { button, duration_ms } => {
            client.push_button((*button).into(), *duration_ms).await?;
            Ok(())
        }

        ActionRequest::SetToggle { toggle, enabled } => match toggle {
            ToggleKind::Ssh => Ok(client.set_ssh(*enabled).await?),
            ToggleKind::Mdns => Ok(client.set_mdns(*enabled).await?),
            // The virtual-device endpoint flips state rather than setting
            // it, so only call it when the desired state differs.
            ToggleKind::VirtualNetwork => {
                flip_if_needed(coordinator, VirtualDevice::Network, *enabled).await
            }
            ToggleKind::VirtualDisk => {
                flip_if_needed(coordinator, VirtualDevice::Disk, *enabled).await
            }
        },

        ActionRequest::PasteText { text } => {
            client.paste_text(text).await?;
            Ok(())
        }

        ActionRequest::Reboot => {
            client.reboot().await?;
            Ok(())
        }

        ActionRequest::ResetHdmi => {
            // HDMI reset exists on the PCIE revision only.
            let state = coordinator.state();
            let snapshot = state.snapshot.ok_or(CoreError::DeviceUnavailable)?;
            if snapshot.hardware_version != HardwareVersion::Pcie {
                return Err(CoreError::Unsupported {
                    operation: "reset_hdmi".into(),
                    required: "PCIE hardware".into(),
                });
            }
            client.reset_hdmi().await?;
            Ok(())
        }

        ActionRequest::ResetHid => {
            client.reset_hid().await?;
            Ok(())
        }

        ActionRequest::WakeOnLan { mac } => wol::send(mac).await,
    }
}

async fn flip_if_needed(
    coordinator: &Coordinator,
    device: VirtualDevice,
    enabled: bool,
) -> Result<(), CoreError> {
    let current = coordinator.state().snapshot.map(|s| match device {
        VirtualDevice::Network => s.virtual_network,
        VirtualDevice::Disk => s.virtual_disk,
    });

    if current == Some(enabled) {
        return Ok(());
    }
    coordinator.client().toggle_virtual_device(device).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn button_duration_bounds() {
        let ok = ActionRequest::PushButton {
            button: ButtonType::Power,
            duration_ms: 100,
        };
        assert!(ok.validate().is_ok());

        let too_short = ActionRequest::PushButton {
            button: ButtonType::Reset,
            duration_ms: 99,
        };
        assert!(matches!(
            too_short.validate(),
            Err(CoreError::Validation { .. })
        ));

        let too_long = ActionRequest::PushButton {
            button: ButtonType::Power,
            duration_ms: 5001,
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn button_type_parses_known_names_only() {
        assert_eq!(ButtonType::from_str("power").unwrap(), ButtonType::Power);
        assert_eq!(ButtonType::from_str("reset").unwrap(), ButtonType::Reset);
        assert!(matches!(
            ButtonType::from_str("banana"),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn paste_text_rejects_non_ascii_and_empty() {
        let ok = ActionRequest::PasteText {
            text: "Hello, world! ~".into(),
        };
        assert!(ok.validate().is_ok());

        let empty = ActionRequest::PasteText { text: String::new() };
        assert!(empty.validate().is_err());

        let non_ascii = ActionRequest::PasteText {
            text: "caf\u{e9}".into(),
        };
        assert!(matches!(
            non_ascii.validate(),
            Err(CoreError::Validation { .. })
        ));

        let control = ActionRequest::PasteText {
            text: "line1\nline2".into(),
        };
        assert!(control.validate().is_err());
    }
}
