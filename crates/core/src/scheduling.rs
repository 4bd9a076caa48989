//! Timing constants and batch planning for background generation work.

use std::time::Duration;

use crate::types::Timestamp;

/// Customers scheduled per batch in a bulk generation request.
pub const BULK_BATCH_SIZE: usize = 10;

/// Delay applied to every generation scheduled from a bulk request, to
/// spread load on the design API.
pub const BULK_SCHEDULE_DELAY: Duration = Duration::from_secs(5);

/// How often the design poller sweeps in-progress jobs.
pub const DESIGN_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// Cached access tokens expiring within this window are refreshed.
pub const TOKEN_REFRESH_BUFFER_MINS: i64 = 15;

/// Expiry of a token issued at `now` that lives `expires_in` seconds.
///
/// `None` for negative lifetimes or ones too large to represent.
pub fn token_expiry(now: Timestamp, expires_in: i64) -> Option<Timestamp> {
    if expires_in < 0 {
        return None;
    }
    now.checked_add_signed(chrono::Duration::try_seconds(expires_in)?)
}

/// Split `items` into consecutive batches of at most `size` entries.
///
/// A `size` of zero is treated as one so the plan is never empty for
/// non-empty input.
pub fn plan_batches<T>(items: &[T], size: usize) -> Vec<&[T]> {
    items.chunks(size.max(1)).collect()
}
