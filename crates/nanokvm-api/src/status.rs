// Status (read-only) endpoints
//
// One method per polled field group. All return the unwrapped `data`
// payload; the envelope is handled by the request helpers in `client.rs`.

use tracing::debug;

use crate::client::NanoKvmClient;
use crate::error::Error;
use crate::models::{
    CdromStatus, DeviceInfo, GpioInfo, HardwareInfo, HidMode, MdnsState, MountedImage, OledInfo,
    SshState, VirtualDeviceInfo, WifiStatus,
};

impl NanoKvmClient {
    /// Device identity and firmware version.
    ///
    /// `GET /api/vm/info`
    pub async fn get_info(&self) -> Result<DeviceInfo, Error> {
        self.get("vm/info").await
    }

    /// Hardware revision (Alpha / Beta / PCIE).
    ///
    /// `GET /api/vm/hardware`
    pub async fn get_hardware(&self) -> Result<HardwareInfo, Error> {
        self.get("vm/hardware").await
    }

    /// Power and HDD LED states sampled from the host's front-panel header.
    ///
    /// `GET /api/vm/gpio`
    pub async fn get_gpio(&self) -> Result<GpioInfo, Error> {
        self.get("vm/gpio").await
    }

    /// Virtual USB network/disk gadget flags.
    ///
    /// `GET /api/vm/virtual-device`
    pub async fn get_virtual_device(&self) -> Result<VirtualDeviceInfo, Error> {
        self.get("vm/virtual-device").await
    }

    /// `GET /api/extensions/ssh`
    pub async fn get_ssh_state(&self) -> Result<SshState, Error> {
        self.get("extensions/ssh").await
    }

    /// `GET /api/vm/mdns`
    pub async fn get_mdns_state(&self) -> Result<MdnsState, Error> {
        self.get("vm/mdns").await
    }

    /// `GET /api/hid/mode`
    pub async fn get_hid_mode(&self) -> Result<HidMode, Error> {
        self.get("hid/mode").await
    }

    /// OLED presence and sleep timeout.
    ///
    /// `GET /api/vm/oled`
    pub async fn get_oled(&self) -> Result<OledInfo, Error> {
        self.get("vm/oled").await
    }

    /// `GET /api/network/wifi`
    pub async fn get_wifi_status(&self) -> Result<WifiStatus, Error> {
        self.get("network/wifi").await
    }

    /// Currently mounted virtual-media image, if any.
    ///
    /// `GET /api/storage/image/mounted`
    pub async fn get_mounted_image(&self) -> Result<MountedImage, Error> {
        self.get("storage/image/mounted").await
    }

    /// Whether the mounted image is exposed in CD-ROM mode.
    ///
    /// `GET /api/storage/cdrom`
    pub async fn get_cdrom_status(&self) -> Result<CdromStatus, Error> {
        debug!("fetching cdrom status");
        self.get("storage/cdrom").await
    }
}
