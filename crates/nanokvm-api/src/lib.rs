// nanokvm-api: Async Rust client for the Sipeed NanoKVM REST API

pub mod actions;
pub mod client;
pub mod error;
pub mod models;
pub mod status;
pub mod transport;

pub use client::NanoKvmClient;
pub use error::Error;
pub use models::{
    CdromStatus, DeviceInfo, GpioInfo, GpioType, HardwareInfo, HardwareVersion, HidMode,
    HidModeKind, MdnsState, MountedImage, OledInfo, SshState, VirtualDevice, VirtualDeviceInfo,
    WifiStatus,
};
pub use transport::TransportConfig;
