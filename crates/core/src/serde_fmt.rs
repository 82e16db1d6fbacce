//! Serde adapters for the wire formats used by roster sources and stores.
//!
//! - dates: `YYYY-MM-DD`
//! - clock times: written as `HH:MM`, read from `HH:MM` or `HH:MM:SS`
//!   (seconds are discarded)
//! - timestamps: RFC 3339

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Result<Date, time::error::Parse> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(text.trim(), &format)
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    let format = format_description!("[year]-[month]-[day]");
    date.format(&format)
        .unwrap_or_else(|_| format!("{}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day()))
}

/// Parse a clock time, truncated to the minute.
pub fn parse_clock(text: &str) -> Result<Time, time::error::Parse> {
    let text = text.trim();
    let with_seconds = format_description!("[hour]:[minute]:[second]");
    let without_seconds = format_description!("[hour]:[minute]");
    let parsed = Time::parse(text, &with_seconds).or_else(|_| Time::parse(text, &without_seconds))?;
    Ok(truncate_to_minute(parsed))
}

/// Format a clock time as `HH:MM`.
pub fn format_clock(t: Time) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

/// Drop seconds and sub-second precision.
pub fn truncate_to_minute(t: Time) -> Time {
    Time::from_hms(t.hour(), t.minute(), 0).unwrap_or(t)
}

pub mod date {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_date(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_date(&text).map_err(|e| D::Error::custom(format!("invalid date '{}': {}", text, e)))
    }
}

pub mod clock {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<Time>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.serialize_some(&format_clock(*t)),
            None => serializer.serialize_none(),
        }
    }

    /// Accepts `null`, an empty string, `HH:MM` or `HH:MM:SS`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Time>, D::Error> {
        let text: Option<String> = Option::deserialize(deserializer)?;
        match text.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse_clock(s)
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid time '{}': {}", s, e))),
        }
    }
}

pub mod timestamp {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &OffsetDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let text = value.format(&Rfc3339).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<OffsetDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&text, &Rfc3339).map_err(D::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<OffsetDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(ts) => {
                    let text = ts.format(&Rfc3339).map_err(S::Error::custom)?;
                    serializer.serialize_some(&text)
                }
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<OffsetDateTime>, D::Error> {
            let text: Option<String> = Option::deserialize(deserializer)?;
            text.map(|t| OffsetDateTime::parse(&t, &Rfc3339).map_err(D::Error::custom))
                .transpose()
        }
    }
}
