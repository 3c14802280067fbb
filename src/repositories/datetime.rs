// src/repositories/datetime.rs
//
// Storage representation of timestamps.
//
// Times are persisted as text with second precision; sub-second information
// is lost on round-trip. The census natural key (start time) relies on this
// exact format, so both mapping directions must share it.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::AppResult;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)?;
    Ok(naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn round_trips_with_second_precision() {
        let timestamp = Utc.with_ymd_and_hms(2018, 4, 7, 6, 30, 15).unwrap();
        let formatted = format_timestamp(timestamp);
        assert_eq!(formatted, "2018-04-07 06:30:15");
        assert_eq!(parse_timestamp(&formatted).unwrap(), timestamp);
    }

    #[test]
    fn sub_second_precision_is_truncated() {
        let timestamp = Utc
            .with_ymd_and_hms(2018, 4, 7, 6, 30, 15)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(750))
            .unwrap();
        let restored = parse_timestamp(&format_timestamp(timestamp)).unwrap();
        assert_eq!(restored.timestamp_subsec_millis(), 0);
        assert_eq!(restored.timestamp(), timestamp.timestamp());
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(parse_timestamp("07.04.2018 06:30").is_err());
    }
}
