use jiff::Timestamp;

/// Current instant truncated to microsecond precision.
///
/// PostgreSQL `timestamptz` keeps microseconds, so values produced here
/// read back unchanged from every backend.
pub fn now() -> Timestamp {
    truncate_to_micros(Timestamp::now())
}

pub fn truncate_to_micros(ts: Timestamp) -> Timestamp {
    Timestamp::from_microsecond(ts.as_microsecond()).unwrap_or(ts)
}
