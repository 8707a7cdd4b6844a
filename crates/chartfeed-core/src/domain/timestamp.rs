use std::fmt::{Display, Formatter};
use std::ops::Sub;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, UtcOffset};

use crate::ValidationError;

/// Instant guaranteed to be UTC.
///
/// Accepts the timestamp shapes seen in metric feeds: RFC3339 strings,
/// date-only strings (`2024-01-31`, midnight UTC), and unix epochs in
/// seconds or milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();

        if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
            return Ok(Self(parsed.to_offset(UtcOffset::UTC)));
        }

        let date_only = format_description!("[year]-[month]-[day]");
        if let Ok(date) = Date::parse(trimmed, date_only) {
            return Ok(Self(date.midnight().assume_utc()));
        }

        Err(ValidationError::InvalidTimestamp {
            value: input.to_owned(),
        })
    }

    pub fn from_unix_seconds(seconds: i64) -> Result<Self, ValidationError> {
        OffsetDateTime::from_unix_timestamp(seconds)
            .map(Self)
            .map_err(|_| ValidationError::EpochOutOfRange { value: seconds })
    }

    pub fn from_unix_millis(millis: i64) -> Result<Self, ValidationError> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
            .map(Self)
            .map_err(|_| ValidationError::EpochOutOfRange { value: millis })
    }

    pub fn unix_seconds(self) -> i64 {
        self.0.unix_timestamp()
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    /// Truncate to the top of the hour.
    pub fn floor_to_hour(self) -> Self {
        let floored = self
            .0
            .replace_minute(0)
            .and_then(|dt| dt.replace_second(0))
            .and_then(|dt| dt.replace_nanosecond(0))
            .expect("zero is a valid clock component");
        Self(floored)
    }

    /// Truncate to midnight UTC.
    pub fn floor_to_day(self) -> Self {
        let floored = self
            .floor_to_hour()
            .0
            .replace_hour(0)
            .expect("zero is a valid clock component");
        Self(floored)
    }

    /// January 1 of this instant's year, midnight UTC.
    pub fn year_start(self) -> Self {
        let jan_first = Date::from_calendar_date(self.0.year(), Month::January, 1)
            .expect("January 1 exists in every year");
        Self(jan_first.midnight().assume_utc())
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .expect("UtcDateTime must be RFC3339 formattable")
    }

    /// `YYYY-MM-DD`, the date key used by chart documents.
    pub fn format_date(self) -> String {
        let date_only = format_description!("[year]-[month]-[day]");
        self.0
            .format(date_only)
            .expect("UtcDateTime must be date formattable")
    }
}

impl Sub<Duration> for UtcDateTime {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self {
        Self(self.0 - rhs)
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
