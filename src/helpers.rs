use std::str::FromStr;

use chrono::{NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::prelude::*;

/// Parses an RFC 3339 timestamp, or a naive ISO 8601 one which is then taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime> {
    match chrono::DateTime::parse_from_rfc3339(value) {
        Ok(timestamp) => Ok(timestamp.with_timezone(&Utc)),
        Err(_) => NaiveDateTime::from_str(value)
            .map(|timestamp| Utc.from_utc_datetime(&timestamp))
            .with_context(|| format!("`{}` is not a valid timestamp", value)),
    }
}

pub fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> StdResult<DateTime, D::Error> {
    parse_timestamp(&String::deserialize(deserializer)?)
        .map_err(|error| serde::de::Error::custom(format!("{:#}", error)))
}

pub fn format_elapsed(instant: Instant) -> String {
    humantime::format_duration(instant.elapsed()).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};

    use super::*;

    #[test]
    fn parse_rfc3339_ok() -> Result {
        let timestamp = parse_timestamp("2024-03-01T12:30:45.123456+02:00")?;
        assert_eq!(timestamp.hour(), 10);
        assert_eq!(timestamp.nanosecond(), 123_456_000);
        Ok(())
    }

    #[test]
    fn parse_naive_ok() -> Result {
        let timestamp = parse_timestamp("2024-03-01T12:30:45.123456")?;
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|date| date.and_hms_micro_opt(12, 30, 45, 123_456))
            .map(|timestamp| Utc.from_utc_datetime(&timestamp));
        assert_eq!(Some(timestamp), expected);
        Ok(())
    }

    #[test]
    fn parse_garbage_fails() {
        assert!(parse_timestamp("yesterday").is_err());
    }
}
