use chrono::{DateTime, Utc};

/// UTC timestamp down to microseconds, e.g. `20240131235959123456`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%6f";

/// Resolve the submission identifier.
///
/// A non-empty caller-supplied identifier is returned unchanged and is not checked
/// against earlier records. Otherwise the identifier is the email followed by `now`
/// in [`TIMESTAMP_FORMAT`]. Two assignments for the same email within the same
/// microsecond collide.
pub fn assign(supplied: Option<&str>, email: &str, now: DateTime<Utc>) -> String {
    match supplied {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("{email}{}", now.format(TIMESTAMP_FORMAT)),
    }
}
