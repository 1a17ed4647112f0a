//! Data-flow start time computation.

use chrono::Utc;

pub const DEFAULT_START_OFFSET_MINUTES: i64 = 60;

/// `now + offset_minutes * 60`, in Unix seconds. Negative offsets are passed through.
pub fn start_time_after(now_unix_secs: i64, offset_minutes: i64) -> i64 {
    now_unix_secs.saturating_add(offset_minutes.saturating_mul(60))
}

/// Start time `offset_minutes` from the current UTC clock.
pub fn future_timestamp(offset_minutes: i64) -> i64 {
    start_time_after(Utc::now().timestamp(), offset_minutes)
}
