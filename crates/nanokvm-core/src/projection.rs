// ── Entity projections ──
//
// Stateless, read-only views over the coordinator snapshot: one
// descriptor per exposed field, each a pure function of the snapshot
// plus an availability gate. No projection polls or mutates anything;
// consumers re-derive whenever the coordinator publishes a new state.

use std::fmt;

use nanokvm_api::HardwareVersion;

use crate::coordinator::CoordinatorState;
use crate::snapshot::DeviceSnapshot;

/// The value a projection yields for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityValue {
    /// No snapshot yet, or this field does not apply to the device.
    Unavailable,
    Bool(bool),
    Text(String),
    Seconds(u64),
}

impl fmt::Display for EntityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "unavailable"),
            Self::Bool(true) => write!(f, "on"),
            Self::Bool(false) => write!(f, "off"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Seconds(s) => write!(f, "{s}s"),
        }
    }
}

/// What kind of entity a projection feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    BinarySensor,
    Sensor,
}

/// One read-only view over the snapshot.
pub struct ProjectionDescriptor {
    /// Stable identifier, e.g. `power_led`.
    pub key: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    pub kind: ProjectionKind,
    value: fn(&DeviceSnapshot) -> EntityValue,
    /// Gate for fields that only exist on some hardware or states.
    available: fn(&DeviceSnapshot) -> bool,
}

impl ProjectionDescriptor {
    /// Derive this projection's value from the coordinator state.
    ///
    /// `Unavailable` when no snapshot has ever succeeded, when the last
    /// one is older than the staleness threshold, or when the
    /// availability gate says the field does not apply.
    pub fn project(&self, state: &CoordinatorState) -> EntityValue {
        if !state.is_available() {
            return EntityValue::Unavailable;
        }
        match &state.snapshot {
            None => EntityValue::Unavailable,
            Some(snapshot) if !(self.available)(snapshot) => EntityValue::Unavailable,
            Some(snapshot) => (self.value)(snapshot),
        }
    }
}

fn always(_: &DeviceSnapshot) -> bool {
    true
}

/// Boolean projections.
pub const BINARY_SENSORS: &[ProjectionDescriptor] = &[
    ProjectionDescriptor {
        key: "power_led",
        name: "Power LED",
        kind: ProjectionKind::BinarySensor,
        value: |s| EntityValue::Bool(s.power_led),
        available: always,
    },
    ProjectionDescriptor {
        key: "hdd_led",
        name: "HDD LED",
        kind: ProjectionKind::BinarySensor,
        value: |s| EntityValue::Bool(s.hdd_led),
        // The HDD LED header is only wired on Alpha hardware.
        available: |s| s.hardware_version == HardwareVersion::Alpha,
    },
    ProjectionDescriptor {
        key: "virtual_network",
        name: "Virtual Network Device",
        kind: ProjectionKind::BinarySensor,
        value: |s| EntityValue::Bool(s.virtual_network),
        available: always,
    },
    ProjectionDescriptor {
        key: "virtual_disk",
        name: "Virtual Disk Device",
        kind: ProjectionKind::BinarySensor,
        value: |s| EntityValue::Bool(s.virtual_disk),
        available: always,
    },
    ProjectionDescriptor {
        key: "ssh_enabled",
        name: "SSH Enabled",
        kind: ProjectionKind::BinarySensor,
        value: |s| EntityValue::Bool(s.ssh_enabled),
        available: always,
    },
    ProjectionDescriptor {
        key: "mdns_enabled",
        name: "mDNS Enabled",
        kind: ProjectionKind::BinarySensor,
        value: |s| EntityValue::Bool(s.mdns_enabled),
        available: always,
    },
    ProjectionDescriptor {
        key: "oled_present",
        name: "OLED Present",
        kind: ProjectionKind::BinarySensor,
        value: |s| EntityValue::Bool(s.oled_present),
        available: always,
    },
    ProjectionDescriptor {
        key: "wifi_supported",
        name: "WiFi Supported",
        kind: ProjectionKind::BinarySensor,
        value: |s| EntityValue::Bool(s.wifi_supported),
        available: always,
    },
    ProjectionDescriptor {
        key: "wifi_connected",
        name: "WiFi Connected",
        kind: ProjectionKind::BinarySensor,
        value: |s| EntityValue::Bool(s.wifi_connected),
        available: |s| s.wifi_supported,
    },
    ProjectionDescriptor {
        key: "cdrom_mode",
        name: "CD-ROM Mode",
        kind: ProjectionKind::BinarySensor,
        value: |s| EntityValue::Bool(s.cdrom_mode),
        available: DeviceSnapshot::has_mounted_image,
    },
];

/// Text and numeric projections.
pub const SENSORS: &[ProjectionDescriptor] = &[
    ProjectionDescriptor {
        key: "hid_mode",
        name: "HID Mode",
        kind: ProjectionKind::Sensor,
        value: |s| EntityValue::Text(s.hid_mode.to_string()),
        available: always,
    },
    ProjectionDescriptor {
        key: "oled_sleep",
        name: "OLED Sleep Timeout",
        kind: ProjectionKind::Sensor,
        value: |s| EntityValue::Seconds(s.oled_sleep_secs),
        available: |s| s.oled_present,
    },
    ProjectionDescriptor {
        key: "hardware_version",
        name: "Hardware Version",
        kind: ProjectionKind::Sensor,
        value: |s| EntityValue::Text(s.hardware_version.to_string()),
        available: always,
    },
    ProjectionDescriptor {
        key: "application_version",
        name: "Application Version",
        kind: ProjectionKind::Sensor,
        value: |s| EntityValue::Text(s.application_version.clone()),
        available: always,
    },
    ProjectionDescriptor {
        key: "mounted_image",
        name: "Mounted Image",
        kind: ProjectionKind::Sensor,
        value: |s| EntityValue::Text(s.mounted_image.clone()),
        available: DeviceSnapshot::has_mounted_image,
    },
];

/// All projections, binary sensors first.
pub fn all() -> impl Iterator<Item = &'static ProjectionDescriptor> {
    BINARY_SENSORS.iter().chain(SENSORS.iter())
}

/// Look up a projection by its stable key.
pub fn by_key(key: &str) -> Option<&'static ProjectionDescriptor> {
    all().find(|d| d.key == key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use nanokvm_api::HidModeKind;

    use super::*;

    fn sample_snapshot() -> DeviceSnapshot {
        DeviceSnapshot {
            device_key: "abc123".into(),
            mdns: "nanokvm.local".into(),
            ip: "192.168.1.50".into(),
            application_version: "2.1.5".into(),
            hardware_version: HardwareVersion::Beta,
            power_led: true,
            hdd_led: false,
            virtual_network: true,
            virtual_disk: false,
            ssh_enabled: false,
            mdns_enabled: true,
            hid_mode: HidModeKind::Normal,
            oled_present: true,
            oled_sleep_secs: 60,
            wifi_supported: false,
            wifi_connected: false,
            mounted_image: String::new(),
            cdrom_mode: false,
            fetched_at: Utc::now(),
        }
    }

    fn state_with(snapshot: DeviceSnapshot) -> CoordinatorState {
        CoordinatorState {
            snapshot: Some(Arc::new(snapshot)),
            last_success: Some(Utc::now()),
            generation: 1,
            ..CoordinatorState::default()
        }
    }

    #[test]
    fn power_on_ssh_off_projects_as_expected() {
        let state = state_with(sample_snapshot());

        assert_eq!(
            by_key("power_led").unwrap().project(&state),
            EntityValue::Bool(true)
        );
        assert_eq!(
            by_key("ssh_enabled").unwrap().project(&state),
            EntityValue::Bool(false)
        );
    }

    #[test]
    fn no_snapshot_means_every_projection_is_unavailable() {
        let state = CoordinatorState::default();
        for descriptor in all() {
            assert_eq!(descriptor.project(&state), EntityValue::Unavailable);
        }
    }

    #[test]
    fn a_stale_snapshot_projects_as_unavailable() {
        let mut state = state_with(sample_snapshot());
        assert!(state.is_available());

        // Snapshot far older than the staleness threshold: the device
        // stopped answering long ago and must not read as live.
        state.last_success = Some(Utc::now() - chrono::Duration::seconds(600));
        assert!(!state.is_available());
        for descriptor in all() {
            assert_eq!(descriptor.project(&state), EntityValue::Unavailable);
        }
    }

    #[test]
    fn hdd_led_requires_alpha_hardware() {
        let state = state_with(sample_snapshot()); // Beta
        assert_eq!(
            by_key("hdd_led").unwrap().project(&state),
            EntityValue::Unavailable
        );

        let mut alpha = sample_snapshot();
        alpha.hardware_version = HardwareVersion::Alpha;
        assert_eq!(
            by_key("hdd_led").unwrap().project(&state_with(alpha)),
            EntityValue::Bool(false)
        );
    }

    #[test]
    fn wifi_connected_gated_on_support() {
        let state = state_with(sample_snapshot()); // unsupported
        assert_eq!(
            by_key("wifi_connected").unwrap().project(&state),
            EntityValue::Unavailable
        );
        // wifi_supported itself always reads.
        assert_eq!(
            by_key("wifi_supported").unwrap().project(&state),
            EntityValue::Bool(false)
        );
    }

    #[test]
    fn media_projections_need_a_mounted_image() {
        let state = state_with(sample_snapshot());
        assert_eq!(
            by_key("mounted_image").unwrap().project(&state),
            EntityValue::Unavailable
        );
        assert_eq!(
            by_key("cdrom_mode").unwrap().project(&state),
            EntityValue::Unavailable
        );

        let mut mounted = sample_snapshot();
        mounted.mounted_image = "/data/ubuntu.iso".into();
        mounted.cdrom_mode = true;
        let state = state_with(mounted);
        assert_eq!(
            by_key("mounted_image").unwrap().project(&state),
            EntityValue::Text("/data/ubuntu.iso".into())
        );
        assert_eq!(
            by_key("cdrom_mode").unwrap().project(&state),
            EntityValue::Bool(true)
        );
    }

    #[test]
    fn sensor_values_render_for_display() {
        let state = state_with(sample_snapshot());
        assert_eq!(
            by_key("hid_mode").unwrap().project(&state).to_string(),
            "normal"
        );
        assert_eq!(
            by_key("oled_sleep").unwrap().project(&state).to_string(),
            "60s"
        );
        assert_eq!(EntityValue::Unavailable.to_string(), "unavailable");
    }
}
