//! Wire timestamps — ISO-8601 local date-time without a UTC offset.

use chrono::Local;

/// Current local time formatted as `YYYY-MM-DDTHH:MM:SS.mmm`.
pub fn now() -> String {
    Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}
