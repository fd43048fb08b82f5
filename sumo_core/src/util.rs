//! Common time/period helpers for sumo_core.

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Compute the tick period in milliseconds for a given loop rate in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero.
/// - Ensures result is at least 1 millisecond.
#[inline]
pub fn period_ms(hz: u32) -> u64 {
    debug_assert!(hz > 0, "tick_hz must be > 0");
    (MILLIS_PER_SEC / u64::from(hz.max(1))).max(1)
}

/// Saturating `now - then` in milliseconds, for window checks against stamps
/// that may lie in the future (a turn stamped at its completion time).
#[inline]
pub fn elapsed_ms(now_ms: u64, then_ms: u64) -> u64 {
    now_ms.saturating_sub(then_ms)
}
