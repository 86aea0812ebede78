//! Text encoding for timestamps stored in SQLite.
//!
//! Every value is written in UTC with exactly nine fractional digits, so
//! byte-wise string order matches chronological order.

use jiff::Timestamp;
use jiff::fmt::temporal::DateTimePrinter;

use crate::error::RepositoryError;

static PRINTER: DateTimePrinter = DateTimePrinter::new().precision(Some(9));

/// `2024-06-19T15:22:45.123456000Z`
pub fn encode(ts: Timestamp) -> String {
    PRINTER.timestamp_to_string(&ts)
}

/// Parses a stored value, naming it in the error when it is malformed.
pub fn decode(value: &str) -> Result<Timestamp, RepositoryError> {
    value
        .parse::<Timestamp>()
        .map_err(|source| RepositoryError::Format {
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_with_nine_fraction_digits() {
        let ts = Timestamp::new(1_718_810_565, 123_456_000).unwrap();
        assert_eq!(encode(ts), "2024-06-19T15:22:45.123456000Z");
        assert_eq!(encode(Timestamp::UNIX_EPOCH), "1970-01-01T00:00:00.000000000Z");
    }

    #[test]
    fn accepts_other_rfc3339_shapes() {
        let ts = decode("2024-06-19T17:22:45+02:00").unwrap();
        assert_eq!(ts, Timestamp::new(1_718_810_565, 0).unwrap());
    }

    #[test]
    fn malformed_value_names_the_string() {
        match decode("yesterday-ish") {
            Err(RepositoryError::Format { value, .. }) => assert_eq!(value, "yesterday-ish"),
            other => panic!("Expected Format error, got {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn lexical_order_matches_time_order(
            a_secs in 0i64..253_402_207_200,
            a_nanos in 0i32..1_000_000_000,
            b_secs in 0i64..253_402_207_200,
            b_nanos in 0i32..1_000_000_000,
        ) {
            let a = Timestamp::new(a_secs, a_nanos).unwrap();
            let b = Timestamp::new(b_secs, b_nanos).unwrap();
            let (ea, eb) = (encode(a), encode(b));
            prop_assert_eq!(ea.len(), eb.len());
            prop_assert_eq!(ea.cmp(&eb), a.cmp(&b));
            prop_assert_eq!(decode(&ea).unwrap(), a);
        }
    }
}
