//! Clock utilities shared by the mixer components
use chrono::{DateTime, TimeZone, Utc};

/// Gets system clock in seconds since unix epoch
pub fn unix_time_secs() -> u64 {
    Utc::now().timestamp() as u64
}

/// Gets system clock in millisec since unix epoch
pub fn get_utc_timestamp_millis() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Converts timestamp in millisec to DateTime UTC
pub fn from_ts_millis(ts: u64) -> DateTime<Utc> {
    Utc.timestamp((ts / 1_000) as i64, (ts % 1000) as u32 * 1_000_000)
}
