use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    UtcOffset,
};

/// A UTC instant with millisecond precision.
///
/// The server stores whatever the browser client sent, which is the output of
/// `Date.toISOString()`, so that is the format written back. Any RFC 3339
/// string is accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    pub fn now() -> Self {
        Self::from(OffsetDateTime::now_utc())
    }

    pub fn parse(raw: &str) -> Result<Self, time::error::Parse> {
        OffsetDateTime::parse(raw.trim(), &Rfc3339).map(Self::from)
    }

    pub fn as_offset_date_time(&self) -> OffsetDateTime {
        self.0
    }

    /// Milliseconds since the Unix epoch, like `Date.getTime()`.
    pub fn unix_millis(&self) -> i64 {
        (self.0.unix_timestamp_nanos() / 1_000_000) as i64
    }

    /// Signed milliseconds from `earlier` to `self`.
    pub fn millis_since(&self, earlier: Timestamp) -> i64 {
        self.unix_millis() - earlier.unix_millis()
    }

    pub fn to_iso_string(&self) -> String {
        let format = format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        );
        self.0
            .format(format)
            .unwrap_or_else(|_| self.0.unix_timestamp().to_string())
    }

    /// Two-digit hour and minute at the given offset, e.g. `07:45`.
    pub fn clock_at(&self, offset: UtcOffset) -> String {
        let format = format_description!("[hour]:[minute]");
        self.0
            .to_offset(offset)
            .format(format)
            .unwrap_or_default()
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(dt: OffsetDateTime) -> Self {
        let dt = dt.to_offset(UtcOffset::UTC);
        // Browser dates carry milliseconds only.
        let truncated = dt
            .replace_nanosecond(u32::from(dt.millisecond()) * 1_000_000)
            .unwrap_or(dt);
        Self(truncated)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(de::Error::custom)
    }
}

/// Optional timestamps. `null`, a missing field and `""` all read as `None`.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => ts.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => Timestamp::parse(s).map(Some).map_err(de::Error::custom),
        }
    }
}

/// A completion list the server may send back as `null`.
pub(crate) fn nullable_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Timestamp>, D::Error> {
    let raw: Option<Vec<Timestamp>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn writes_browser_iso_format() {
        let ts = Timestamp::from(datetime!(2024-03-05 07:08:09.123456 +02:00));
        assert_eq!(ts.to_iso_string(), "2024-03-05T05:08:09.123Z");
    }

    #[test]
    fn reads_any_rfc3339_offset() {
        let a = Timestamp::parse("2024-03-05T05:08:09.123Z").unwrap();
        let b = Timestamp::parse("2024-03-05T07:08:09.123+02:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn millis_since_is_signed() {
        let a = Timestamp::parse("2024-03-05T05:00:00.000Z").unwrap();
        let b = Timestamp::parse("2024-03-05T05:01:30.500Z").unwrap();
        assert_eq!(b.millis_since(a), 90_500);
        assert_eq!(a.millis_since(b), -90_500);
    }

    #[test]
    fn clock_uses_requested_offset() {
        let ts = Timestamp::parse("2024-03-05T23:30:00.000Z").unwrap();
        assert_eq!(ts.clock_at(UtcOffset::UTC), "23:30");
        assert_eq!(ts.clock_at(offset!(+01:00)), "00:30");
    }

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, with = "option")]
        at: Option<Timestamp>,
    }

    #[test]
    fn empty_optional_timestamps_read_as_none() {
        for raw in [r#"{"at":null}"#, r#"{"at":""}"#, "{}"] {
            let holder: Holder = serde_json::from_str(raw).unwrap();
            assert!(holder.at.is_none(), "{raw}");
        }
    }
}
