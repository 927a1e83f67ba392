use time::OffsetDateTime;

pub const MINUTE: i64 = 60;
pub const HOUR: i64 = 60 * MINUTE;

/// Current time as unix seconds, the unit every table stores.
pub fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}
