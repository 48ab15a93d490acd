// ── Polling backoff policy ──
//
// Pure function of the consecutive-failure count; the coordinator never
// sleeps itself. Doubling per failure, capped at five doublings and an
// absolute ceiling, so an unreachable device settles at a slow poll
// instead of hammering the network.

use std::time::Duration;

/// Longest interval the backoff will ever produce.
pub const MAX_INTERVAL: Duration = Duration::from_secs(300);

/// Doublings stop here even before the absolute cap kicks in.
const MAX_EXPONENT: u32 = 5;

/// Compute the next polling interval from the base cadence and the
/// coordinator's consecutive-failure count.
pub fn interval(base: Duration, consecutive_failures: u32) -> Duration {
    if consecutive_failures == 0 {
        return base.min(MAX_INTERVAL);
    }
    let factor = 2u32.saturating_pow(consecutive_failures.min(MAX_EXPONENT));
    base.saturating_mul(factor).min(MAX_INTERVAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Duration = Duration::from_secs(30);

    #[test]
    fn healthy_device_polls_at_base_cadence() {
        assert_eq!(interval(BASE, 0), BASE);
    }

    #[test]
    fn interval_doubles_per_failure() {
        assert_eq!(interval(BASE, 1), Duration::from_secs(60));
        assert_eq!(interval(BASE, 2), Duration::from_secs(120));
        assert_eq!(interval(BASE, 3), Duration::from_secs(240));
    }

    #[test]
    fn interval_is_capped() {
        assert_eq!(interval(BASE, 4), MAX_INTERVAL);
        assert_eq!(interval(BASE, 100), MAX_INTERVAL);
    }

    #[test]
    fn large_base_is_clamped_even_when_healthy() {
        assert_eq!(interval(Duration::from_secs(900), 0), MAX_INTERVAL);
    }
}
