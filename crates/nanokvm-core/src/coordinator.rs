// ── Device state coordinator ──
//
// One coordinator per device owns the shared snapshot and serializes
// every fetch. It holds no timer: `refresh()` is invoked by the
// scheduler task (or by action dispatch), which keeps this unit
// directly testable without simulated clocks.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

use nanokvm_api::NanoKvmClient;

use crate::action::{self, ActionRequest};
use crate::config::DeviceConfig;
use crate::error::CoreError;
use crate::snapshot::DeviceSnapshot;

/// Snapshot age past which a device stops presenting as live, absent a
/// configured poll interval to derive it from.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(90);

/// A snapshot older than this many poll intervals is considered stale.
const STALE_INTERVALS: u32 = 3;

/// Observable coordinator state, published through a `watch` channel.
///
/// Replaced as a whole on every refresh outcome -- readers always see a
/// complete, consistent value; torn reads are impossible by construction.
#[derive(Debug, Clone)]
pub struct CoordinatorState {
    /// Latest successful snapshot, or `None` before the first success.
    /// Retained unchanged across failed refreshes (stale-but-available).
    pub snapshot: Option<Arc<DeviceSnapshot>>,
    /// Error message from the most recent refresh, cleared on success.
    pub last_error: Option<String>,
    pub last_success: Option<DateTime<Utc>>,
    /// Consecutive failed refreshes. Drives the scheduler's backoff.
    pub consecutive_failures: u32,
    /// Bumped once per completed refresh (success or failure). Used by
    /// concurrent callers to join an in-flight fetch's outcome.
    pub generation: u64,
    /// Snapshot age past which projections go unavailable.
    pub stale_after: Duration,
}

impl Default for CoordinatorState {
    fn default() -> Self {
        Self {
            snapshot: None,
            last_error: None,
            last_success: None,
            consecutive_failures: 0,
            generation: 0,
            stale_after: DEFAULT_STALE_AFTER,
        }
    }
}

impl CoordinatorState {
    /// A device is presentable while it has ever produced a snapshot and
    /// that snapshot is not older than `stale_after`. Projections gate
    /// on this, so a device that stops answering eventually reads as
    /// unavailable rather than presenting its last snapshot as live.
    pub fn is_available(&self) -> bool {
        match self.last_success {
            Some(t) => (Utc::now() - t)
                .to_std()
                .is_ok_and(|age| age <= self.stale_after),
            None => false,
        }
    }
}

/// Coordinates polling and actions for a single NanoKVM.
pub struct Coordinator {
    client: NanoKvmClient,
    host: String,
    fetch_timeout: Duration,
    state_tx: watch::Sender<CoordinatorState>,
    /// Serializes fetches: at most one in-flight request cycle per device.
    fetch_lock: Mutex<()>,
}

impl Coordinator {
    pub fn new(client: NanoKvmClient, config: &DeviceConfig) -> Self {
        let (state_tx, _) = watch::channel(CoordinatorState {
            stale_after: config.poll_interval.saturating_mul(STALE_INTERVALS),
            ..CoordinatorState::default()
        });
        Self {
            client,
            host: config.host.clone(),
            fetch_timeout: config.timeout,
            state_tx,
            fetch_lock: Mutex::new(()),
        }
    }

    /// The device identity this coordinator serves.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub(crate) fn client(&self) -> &NanoKvmClient {
        &self.client
    }

    /// Current state (cheap clone; the snapshot is behind an `Arc`).
    pub fn state(&self) -> CoordinatorState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to state changes. Projections re-derive on every change.
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorState> {
        self.state_tx.subscribe()
    }

    // ── Refresh ─────────────────────────────────────────────────────

    /// Fetch all status endpoints and publish a new snapshot.
    ///
    /// On success the snapshot is replaced atomically and the failure
    /// count cleared; on failure the count increments, the error is
    /// recorded, and the previous snapshot stays available to readers.
    ///
    /// Concurrent callers never duplicate network I/O: whoever blocks on
    /// the fetch lock while another refresh runs observes that refresh's
    /// outcome instead of issuing a second fetch.
    pub async fn refresh(&self) -> Result<Arc<DeviceSnapshot>, CoreError> {
        let seen = self.state_tx.borrow().generation;
        let _guard = self.fetch_lock.lock().await;

        // A refresh completed while we waited for the lock: join it.
        let current = self.state_tx.borrow().clone();
        if current.generation != seen {
            return match current.last_error {
                None => current.snapshot.ok_or(CoreError::DeviceUnavailable),
                Some(message) => Err(CoreError::RefreshFailed { message }),
            };
        }

        let outcome = match tokio::time::timeout(self.fetch_timeout, self.fetch_snapshot()).await {
            Ok(Ok(snapshot)) => Ok(Arc::new(snapshot)),
            Ok(Err(e)) => Err(CoreError::from(e)),
            Err(_) => Err(CoreError::RefreshFailed {
                message: format!("fetch timed out after {}s", self.fetch_timeout.as_secs()),
            }),
        };

        match outcome {
            Ok(snapshot) => {
                self.state_tx.send_modify(|s| {
                    s.snapshot = Some(Arc::clone(&snapshot));
                    s.last_error = None;
                    s.last_success = Some(snapshot.fetched_at);
                    s.consecutive_failures = 0;
                    s.generation += 1;
                });
                debug!(host = %self.host, "refresh complete");
                Ok(snapshot)
            }
            Err(e) => {
                let message = e.to_string();
                self.state_tx.send_modify(|s| {
                    s.last_error = Some(message);
                    s.consecutive_failures += 1;
                    s.generation += 1;
                });
                warn!(host = %self.host, error = %e, "refresh failed");
                Err(e)
            }
        }
    }

    /// Refresh on demand after a successful action so entity state
    /// reflects the action promptly. Joins any in-flight fetch rather
    /// than duplicating it.
    pub async fn request_refresh(&self) -> Result<Arc<DeviceSnapshot>, CoreError> {
        self.refresh().await
    }

    // ── Action dispatch ─────────────────────────────────────────────

    /// Validate and dispatch an imperative action, then refresh.
    ///
    /// Validation failures never reach the network. Device failures
    /// surface to the caller without touching coordinator state. A
    /// failed post-action refresh is logged, not propagated -- the
    /// action itself already succeeded.
    pub async fn execute(&self, request: ActionRequest) -> Result<(), CoreError> {
        request.validate()?;
        action::route_action(self, &request).await?;

        if let Err(e) = self.request_refresh().await {
            warn!(host = %self.host, error = %e, "post-action refresh failed");
        }
        Ok(())
    }

    // ── Fetch ───────────────────────────────────────────────────────

    /// Pull every monitored field in one cycle. Sub-requests run
    /// concurrently over the single client handle; any failure fails
    /// the whole cycle.
    async fn fetch_snapshot(&self) -> Result<DeviceSnapshot, nanokvm_api::Error> {
        if !self.client.has_token() {
            self.client.login().await?;
        }

        let (info, hardware, gpio, virtual_device, ssh, mdns, hid, oled, wifi, image, cdrom) =
            tokio::try_join!(
                self.client.get_info(),
                self.client.get_hardware(),
                self.client.get_gpio(),
                self.client.get_virtual_device(),
                self.client.get_ssh_state(),
                self.client.get_mdns_state(),
                self.client.get_hid_mode(),
                self.client.get_oled(),
                self.client.get_wifi_status(),
                self.client.get_mounted_image(),
                self.client.get_cdrom_status(),
            )?;

        Ok(DeviceSnapshot {
            device_key: info.device_key,
            mdns: info.mdns,
            ip: info.ip,
            application_version: info.application,
            hardware_version: hardware.version,
            power_led: gpio.pwr,
            hdd_led: gpio.hdd,
            virtual_network: virtual_device.network,
            virtual_disk: virtual_device.disk,
            ssh_enabled: ssh.enabled,
            mdns_enabled: mdns.enabled,
            hid_mode: hid.mode,
            oled_present: oled.exist,
            oled_sleep_secs: oled.sleep,
            wifi_supported: wifi.supported,
            wifi_connected: wifi.connected,
            mounted_image: image.file,
            cdrom_mode: cdrom.cdrom == 1,
            fetched_at: Utc::now(),
        })
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("host", &self.host)
            .field("state", &*self.state_tx.borrow())
            .finish_non_exhaustive()
    }
}
