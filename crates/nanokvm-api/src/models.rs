// Response payloads and request enums for the NanoKVM REST API.
//
// Every endpoint wraps its payload in the `{ code, msg, data }` envelope;
// these types describe the `data` field only. The envelope itself lives
// in `client.rs`.

use serde::{Deserialize, Serialize};

/// The standard NanoKVM response envelope.
///
/// `code` 0 means success; anything else is an API-level failure with
/// a human-readable `msg`. The device uses 401 for a rejected token.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub code: i32,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

/// Envelope code the device returns when the session token is rejected.
pub(crate) const CODE_UNAUTHORIZED: i32 = 401;

// ── Authentication ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
}

// ── Device identity & hardware ──────────────────────────────────────

/// `GET /api/vm/info`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub ip: String,
    pub mdns: String,
    /// Application (firmware) version string.
    pub application: String,
    pub device_key: String,
}

/// Hardware revision of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum HardwareVersion {
    Alpha,
    Beta,
    #[serde(rename = "PCIE")]
    #[strum(serialize = "PCIE")]
    Pcie,
}

/// `GET /api/vm/hardware`
#[derive(Debug, Clone, Deserialize)]
pub struct HardwareInfo {
    pub version: HardwareVersion,
}

// ── Status endpoints ────────────────────────────────────────────────

/// `GET /api/vm/gpio` -- host power and disk-activity LED states.
#[derive(Debug, Clone, Deserialize)]
pub struct GpioInfo {
    pub pwr: bool,
    pub hdd: bool,
}

/// `GET /api/vm/virtual-device` -- USB gadget enablement flags.
#[derive(Debug, Clone, Deserialize)]
pub struct VirtualDeviceInfo {
    pub network: bool,
    pub disk: bool,
}

/// `GET /api/extensions/ssh`
#[derive(Debug, Clone, Deserialize)]
pub struct SshState {
    pub enabled: bool,
}

/// `GET /api/vm/mdns`
#[derive(Debug, Clone, Deserialize)]
pub struct MdnsState {
    pub enabled: bool,
}

/// HID emulation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum HidModeKind {
    #[serde(rename = "normal")]
    #[strum(serialize = "normal")]
    Normal,
    #[serde(rename = "hid-only")]
    #[strum(serialize = "hid-only")]
    HidOnly,
}

/// `GET /api/hid/mode`
#[derive(Debug, Clone, Deserialize)]
pub struct HidMode {
    pub mode: HidModeKind,
}

/// `GET /api/vm/oled`
#[derive(Debug, Clone, Deserialize)]
pub struct OledInfo {
    /// Whether the unit has an OLED panel at all.
    pub exist: bool,
    /// Sleep timeout in seconds (0 = never).
    pub sleep: u64,
}

/// `GET /api/network/wifi`
#[derive(Debug, Clone, Deserialize)]
pub struct WifiStatus {
    pub supported: bool,
    pub connected: bool,
}

/// `GET /api/storage/image/mounted`
#[derive(Debug, Clone, Deserialize)]
pub struct MountedImage {
    /// Path of the mounted image, or empty when nothing is mounted.
    #[serde(default)]
    pub file: String,
}

/// `GET /api/storage/cdrom`
#[derive(Debug, Clone, Deserialize)]
pub struct CdromStatus {
    /// 1 when the mounted image is exposed as a CD-ROM, 0 otherwise.
    pub cdrom: u8,
}

// ── Action parameters ───────────────────────────────────────────────

/// Physical button header driven over GPIO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GpioType {
    Power,
    Reset,
}

/// USB gadget selectable through the virtual-device toggle endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VirtualDevice {
    Network,
    Disk,
}
