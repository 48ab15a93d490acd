// ── Device registry ──
//
// Explicit per-process registry of configured devices, keyed by host.
// Setup creates the client, authenticates, takes the first snapshot,
// and spawns the poll task; teardown cancels the task and drops the
// handle. No ambient globals: embedders own the registry instance.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use nanokvm_api::{NanoKvmClient, TransportConfig};

use crate::config::DeviceConfig;
use crate::coordinator::Coordinator;
use crate::error::CoreError;
use crate::scheduler;

struct DeviceEntry {
    coordinator: Arc<Coordinator>,
    cancel: CancellationToken,
    poll_task: JoinHandle<()>,
}

/// Registry of all configured devices, one coordinator each.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: DashMap<String, DeviceEntry>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring up one device: authenticate, take the first snapshot, and
    /// start polling.
    ///
    /// Bad credentials are fatal ([`CoreError::SetupAuth`]) -- the
    /// configuration must change before retrying. An unreachable device
    /// is a retryable [`CoreError::SetupConnect`]; nothing is registered
    /// in either failure case.
    pub async fn setup(&self, config: DeviceConfig) -> Result<Arc<Coordinator>, CoreError> {
        let host = config.host.clone();
        if self.devices.contains_key(&host) {
            return Err(CoreError::DeviceExists { host });
        }

        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let client = NanoKvmClient::new(
            &config.host,
            config.username.clone(),
            config.password.clone(),
            &transport,
        )?;

        client.login().await.map_err(|e| match e {
            nanokvm_api::Error::Authentication { message } => CoreError::SetupAuth {
                host: host.clone(),
                message,
            },
            other => CoreError::SetupConnect {
                host: host.clone(),
                reason: other.to_string(),
            },
        })?;

        let coordinator = Arc::new(Coordinator::new(client, &config));

        // First refresh up front so consumers never start from a blank
        // state on a reachable device.
        coordinator.refresh().await.map_err(|e| CoreError::SetupConnect {
            host: host.clone(),
            reason: e.to_string(),
        })?;

        let cancel = CancellationToken::new();
        let poll_task = tokio::spawn(scheduler::poll_task(
            Arc::clone(&coordinator),
            config.poll_interval,
            cancel.clone(),
        ));

        self.devices.insert(
            host.clone(),
            DeviceEntry {
                coordinator: Arc::clone(&coordinator),
                cancel,
                poll_task,
            },
        );

        info!(%host, "device registered");
        Ok(coordinator)
    }

    /// Look up the coordinator for a registered device.
    pub fn get(&self, host: &str) -> Option<Arc<Coordinator>> {
        self.devices.get(host).map(|e| Arc::clone(&e.coordinator))
    }

    /// Tear down one device: stop polling and discard its entry. An
    /// in-flight fetch is dropped with the poll task, so its result is
    /// never applied.
    pub async fn teardown(&self, host: &str) -> Result<(), CoreError> {
        let (_, entry) = self
            .devices
            .remove(host)
            .ok_or_else(|| CoreError::DeviceNotFound { host: host.into() })?;

        entry.cancel.cancel();
        let _ = entry.poll_task.await;

        debug!(%host, "device deregistered");
        Ok(())
    }

    /// Tear down every registered device.
    pub async fn teardown_all(&self) {
        let hosts: Vec<String> = self.devices.iter().map(|e| e.key().clone()).collect();
        for host in hosts {
            let _ = self.teardown(&host).await;
        }
    }

    /// Identities of all registered devices.
    pub fn hosts(&self) -> Vec<String> {
        self.devices.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
