// nanokvm-core: Coordinator layer between nanokvm-api and consumers.
//
// One `Coordinator` per device owns the polling snapshot and serializes
// refreshes; projections derive read-only entity values from it; action
// dispatch validates and forwards imperative calls to the device.

pub mod action;
pub mod backoff;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod projection;
pub mod registry;
pub mod scheduler;
pub mod service;
pub mod snapshot;
pub mod wol;

// ── Primary re-exports ──────────────────────────────────────────────
pub use action::{ActionRequest, ButtonType, ToggleKind};
pub use config::DeviceConfig;
pub use coordinator::{Coordinator, CoordinatorState};
pub use error::CoreError;
pub use projection::{EntityValue, ProjectionDescriptor, ProjectionKind};
pub use registry::DeviceRegistry;
pub use snapshot::DeviceSnapshot;
pub use wol::MacAddress;
