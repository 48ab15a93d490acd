// ── Polling scheduler ──
//
// The external timer the coordinator deliberately does not own. One
// task per device: sleep for the backoff-adjusted interval, invoke
// `refresh()`, repeat until cancelled. Cancellation mid-fetch drops the
// refresh future, so a late result is discarded rather than applied.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::backoff;
use crate::coordinator::Coordinator;

/// Periodically refresh one device until the token is cancelled.
pub async fn poll_task(
    coordinator: Arc<Coordinator>,
    base_interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        let failures = coordinator.state().consecutive_failures;
        let delay = backoff::interval(base_interval, failures);
        if failures > 0 {
            debug!(
                host = %coordinator.host(),
                failures,
                delay_secs = delay.as_secs(),
                "backing off"
            );
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(delay) => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    result = coordinator.refresh() => {
                        if let Err(e) = result {
                            warn!(host = %coordinator.host(), error = %e, "scheduled refresh failed");
                        }
                    }
                }
            }
        }
    }

    debug!(host = %coordinator.host(), "poll task stopped");
}
