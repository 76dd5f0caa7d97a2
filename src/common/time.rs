//! Simple time helpers used by logging and request timing.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Current timestamp in milliseconds since the Unix epoch.
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Milliseconds elapsed since `start`, saturating into `u64`.
pub fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
