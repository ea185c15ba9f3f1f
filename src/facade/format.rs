// ABOUTME: Display formatting for byte sizes and daemon timestamps.
// ABOUTME: Both formats are coarse on purpose and must stay byte-for-byte stable.

use super::error::{FacadeError, Result};
use chrono::{DateTime, Local};

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// strftime pattern for timestamps, trailing space included.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M ";

/// Render a byte count with a single-letter unit.
///
/// Uses floor division with no decimals, so 1500 bytes is `1K`.
pub fn format_bytes(n: u64) -> String {
    if n >= GIB {
        format!("{}G", n / GIB)
    } else if n >= MIB {
        format!("{}M", n / MIB)
    } else if n >= KIB {
        format!("{}K", n / KIB)
    } else {
        format!("{}B", n)
    }
}

/// Render seconds since the epoch as `YYYY/MM/DD HH:MM ` in the local timezone.
pub fn format_timestamp(epoch_seconds: i64) -> Result<String> {
    let utc = DateTime::from_timestamp(epoch_seconds, 0).ok_or_else(|| {
        FacadeError::protocol(format!("timestamp out of range: {}", epoch_seconds))
    })?;
    Ok(utc.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string())
}
