//! Timestamp utilities for case times
//!
//! Case times are stored as plain strings. Times filled in by the service use
//! the local clock at minute precision: `yyyy-MM-dd HH:mm`.

use chrono::{DateTime, Local, NaiveDateTime};

/// strftime pattern for service-generated case times
pub const CASE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Get current local timestamp
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Format a timestamp as a case time string
pub fn format_case_time(timestamp: &DateTime<Local>) -> String {
    timestamp.format(CASE_TIME_FORMAT).to_string()
}

/// Current local time as a case time string
pub fn case_time_now() -> String {
    format_case_time(&now())
}

/// Check whether a string has the exact service-generated case time shape
pub fn is_case_time(value: &str) -> bool {
    value.len() == 16 && NaiveDateTime::parse_from_str(value, CASE_TIME_FORMAT).is_ok()
}
