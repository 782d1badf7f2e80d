// src/common/time.rs

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::{Asia::Kolkata, Tz};

/// Todo timestamp de proveniência é exibido em IST.
pub const TARGET_TZ: Tz = Kolkata;

// "01 Mar 2024 03:04:05 PM"
const PROVENANCE_FORMAT: &str = "%d %b %Y %I:%M:%S %p";

pub fn now_in_target() -> DateTime<Tz> {
    Utc::now().with_timezone(&TARGET_TZ)
}

pub fn format_provenance<T: TimeZone>(instant: &DateTime<T>) -> String {
    instant
        .with_timezone(&TARGET_TZ)
        .format(PROVENANCE_FORMAT)
        .to_string()
}
