// Imperative action endpoints
//
// These change device or host state. Parameter validation is the
// caller's job (nanokvm-core); this layer only shapes the wire request.

use serde_json::json;
use tracing::debug;

use crate::client::NanoKvmClient;
use crate::error::Error;
use crate::models::{GpioType, VirtualDevice};

impl NanoKvmClient {
    /// Hold a front-panel button for `duration_ms` milliseconds.
    ///
    /// `POST /api/vm/gpio` with `{ "type": ..., "duration": ... }`
    pub async fn push_button(&self, button: GpioType, duration_ms: u64) -> Result<(), Error> {
        debug!(%button, duration_ms, "pushing button");
        self.post_unit("vm/gpio", &json!({ "type": button, "duration": duration_ms }))
            .await
    }

    /// Enable or disable the SSH daemon on the device.
    ///
    /// `POST /api/extensions/ssh`
    pub async fn set_ssh(&self, enabled: bool) -> Result<(), Error> {
        debug!(enabled, "setting ssh state");
        self.post_unit("extensions/ssh", &json!({ "enabled": enabled }))
            .await
    }

    /// Enable or disable mDNS advertisement.
    ///
    /// `POST /api/vm/mdns`
    pub async fn set_mdns(&self, enabled: bool) -> Result<(), Error> {
        debug!(enabled, "setting mdns state");
        self.post_unit("vm/mdns", &json!({ "enabled": enabled })).await
    }

    /// Toggle a virtual USB gadget (network or disk).
    ///
    /// `POST /api/vm/virtual-device`. The endpoint flips the current
    /// state; there is no explicit on/off parameter on the wire.
    pub async fn toggle_virtual_device(&self, device: VirtualDevice) -> Result<(), Error> {
        debug!(%device, "toggling virtual device");
        self.post_unit("vm/virtual-device", &json!({ "device": device }))
            .await
    }

    /// Type `text` on the host through HID keystroke emulation.
    ///
    /// `POST /api/hid/paste`. Truncation and unsupported-character
    /// handling happen device-side.
    pub async fn paste_text(&self, text: &str) -> Result<(), Error> {
        debug!(len = text.len(), "pasting text");
        self.post_unit("hid/paste", &json!({ "content": text })).await
    }

    /// Reboot the NanoKVM itself (not the attached host).
    ///
    /// `POST /api/vm/system/reboot`
    pub async fn reboot(&self) -> Result<(), Error> {
        debug!("rebooting device");
        self.post_unit("vm/system/reboot", &json!({})).await
    }

    /// Reset the HDMI capture path (PCIE hardware only).
    ///
    /// `POST /api/vm/hdmi/reset`
    pub async fn reset_hdmi(&self) -> Result<(), Error> {
        debug!("resetting hdmi");
        self.post_unit("vm/hdmi/reset", &json!({})).await
    }

    /// Reset the HID subsystem.
    ///
    /// `POST /api/hid/reset`
    pub async fn reset_hid(&self) -> Result<(), Error> {
        debug!("resetting hid");
        self.post_unit("hid/reset", &json!({})).await
    }
}
