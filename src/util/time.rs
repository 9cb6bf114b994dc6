use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

const SECS_PER_MINUTE: f64 = 60.0;

/// Wall-clock instant as reported by the backend.
///
/// The backend emits naive ISO timestamps (`2024-03-01T08:15:00`). Timestamps
/// that do carry an offset are normalized to UTC before the offset is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(PrimitiveDateTime);

impl Timestamp {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
            let utc = dt.to_offset(UtcOffset::UTC);
            return Some(Self(PrimitiveDateTime::new(utc.date(), utc.time())));
        }

        PrimitiveDateTime::parse(
            raw,
            format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
            ),
        )
        .or_else(|_| {
            PrimitiveDateTime::parse(
                raw,
                format_description!(
                    "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
                ),
            )
        })
        .ok()
        .map(Self)
    }

    #[cfg(test)]
    pub fn from_unix_seconds(unix: i64) -> Option<Self> {
        let dt = OffsetDateTime::from_unix_timestamp(unix).ok()?;
        Some(Self(PrimitiveDateTime::new(dt.date(), dt.time())))
    }

    /// Current local wall-clock time, falling back to UTC when the local offset
    /// cannot be determined.
    pub fn now() -> Self {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self(PrimitiveDateTime::new(now.date(), now.time()))
    }

    /// Seconds since the unix epoch, reading the wall clock as UTC.
    pub fn unix_seconds(self) -> i64 {
        self.0.assume_utc().unix_timestamp()
    }

    /// Signed number of minutes from `self` to `later`.
    pub fn minutes_until(self, later: Timestamp) -> f64 {
        (later.0 - self.0).as_seconds_f64() / SECS_PER_MINUTE
    }

    /// Fractional hour of day: `hour + minute / 60`.
    pub fn hour_of_day(self) -> f32 {
        f32::from(self.0.hour()) + f32::from(self.0.minute()) / 60.0
    }

    pub fn start_of_day(self) -> Self {
        Self(PrimitiveDateTime::new(self.0.date(), Time::MIDNIGHT))
    }

    pub fn next_day(self) -> Option<Self> {
        let date = self.0.date().next_day()?;
        Some(Self(PrimitiveDateTime::new(date, self.0.time())))
    }

    pub fn date_label(self) -> String {
        let d = self.0.date();
        format!("{:04}-{:02}-{:02}", d.year(), u8::from(d.month()), d.day())
    }

    fn iso(self) -> String {
        let dt = self.0;
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            dt.year(),
            u8::from(dt.month()),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second()
        )
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dt = self.0;
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            dt.year(),
            u8::from(dt.month()),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second()
        )
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.iso())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unparseable timestamp {raw:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_naive_backend_timestamps() {
        let ts = Timestamp::parse("2024-03-01T08:15:30").unwrap();
        assert_eq!(ts.to_string(), "2024-03-01 08:15:30");

        let spaced = Timestamp::parse("2024-03-01 08:15:30").unwrap();
        assert_eq!(ts, spaced);

        let frac = Timestamp::parse("2024-03-01T08:15:30.250").unwrap();
        assert!(frac > ts);
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let ts = Timestamp::parse("2024-03-01T10:00:00+02:00").unwrap();
        assert_eq!(ts.to_string(), "2024-03-01 08:00:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Timestamp::parse("").is_none());
        assert!(Timestamp::parse("yesterday").is_none());
        assert!(serde_json::from_str::<Timestamp>("\"nope\"").is_err());
    }

    #[test]
    fn minutes_and_hours() {
        let a = Timestamp::parse("2024-03-01T08:00:00").unwrap();
        let b = Timestamp::parse("2024-03-01T09:30:00").unwrap();
        assert_eq!(a.minutes_until(b), 90.0);
        assert_eq!(b.minutes_until(a), -90.0);
        assert_eq!(b.hour_of_day(), 9.5);
    }

    #[test]
    fn day_helpers() {
        let ts = Timestamp::parse("2024-02-29T23:59:00").unwrap();
        assert_eq!(ts.start_of_day().to_string(), "2024-02-29 00:00:00");
        assert_eq!(ts.next_day().unwrap().date_label(), "2024-03-01");
    }

    #[test]
    fn serializes_as_iso() {
        let ts = Timestamp::parse("2024-03-01 08:15:30").unwrap();
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2024-03-01T08:15:30\"");
    }

    #[test]
    fn unix_round_trip() {
        let ts = Timestamp::from_unix_seconds(86_400).unwrap();
        assert_eq!(ts.to_string(), "1970-01-02 00:00:00");
        assert_eq!(ts.unix_seconds(), 86_400);
    }
}
