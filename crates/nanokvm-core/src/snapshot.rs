// ── Device snapshot ──
//
// One immutable bundle of every polled field. Built in one piece by the
// coordinator's fetch and replaced wholesale behind an `Arc`; nothing
// ever mutates a published snapshot.

use chrono::{DateTime, Utc};

use nanokvm_api::{HardwareVersion, HidModeKind};

/// All monitored fields of one NanoKVM at a single point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSnapshot {
    // Identity
    pub device_key: String,
    pub mdns: String,
    pub ip: String,
    pub application_version: String,
    pub hardware_version: HardwareVersion,

    // GPIO (front-panel LEDs)
    pub power_led: bool,
    pub hdd_led: bool,

    // Virtual USB gadgets
    pub virtual_network: bool,
    pub virtual_disk: bool,

    // Daemons
    pub ssh_enabled: bool,
    pub mdns_enabled: bool,

    // HID
    pub hid_mode: HidModeKind,

    // OLED panel
    pub oled_present: bool,
    pub oled_sleep_secs: u64,

    // WiFi
    pub wifi_supported: bool,
    pub wifi_connected: bool,

    // Virtual media
    pub mounted_image: String,
    pub cdrom_mode: bool,

    /// When this snapshot was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl DeviceSnapshot {
    /// Whether any virtual-media image is currently mounted.
    pub fn has_mounted_image(&self) -> bool {
        !self.mounted_image.is_empty()
    }
}
