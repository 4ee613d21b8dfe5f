//! Default valuers and time encodings used by generated assignment code.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The `now()` default valuer.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// The `uuid()` default valuer: a freshly generated v4 identifier.
pub fn uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Encode a timestamp as integer Unix-epoch milliseconds, stringified.
pub fn unix_millis(t: &DateTime<Utc>) -> String {
    t.timestamp_millis().to_string()
}

/// Encode a timestamp as integer Unix-epoch seconds, stringified.
pub fn unix_seconds(t: &DateTime<Utc>) -> String {
    t.timestamp().to_string()
}

/// Render a timestamp with one of the fixed named layouts.
///
/// The generator validates layout names at generation time; an unknown name
/// reaching this function falls back to RFC 3339 rather than panicking
/// inside generated code.
pub fn format_named(t: &DateTime<Utc>, layout: &str) -> String {
    match layout {
        "rfc3339" => t.to_rfc3339(),
        "rfc2822" => t.to_rfc2822(),
        "date" => t.format("%Y-%m-%d").to_string(),
        "datetime" => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => t.to_rfc3339(),
    }
}
