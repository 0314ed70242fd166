use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

const MS_PER_SECOND: f64 = 1000.0;
const SECONDS_PER_MINUTE: f64 = 60.0;
const MINUTES_PER_HOUR: f64 = 60.0;
const HOURS_PER_DAY: f64 = 24.0;
/// Months and years are fixed-length approximations, not calendar math.
const DAYS_PER_MONTH: f64 = 30.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// A stored value together with the moment it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Entry {
    #[serde(default)]
    #[cfg_attr(feature = "ts", ts(type = "unknown"))]
    pub data: Value,
    #[serde(default, with = "timestamp")]
    #[cfg_attr(feature = "ts", ts(type = "string | null"))]
    pub time: Option<DateTime<Utc>>,
}

impl Entry {
    /// Stamp `data` with the current time.
    pub fn new(data: Value) -> Self {
        Self {
            data,
            time: Some(Utc::now()),
        }
    }

    /// Decode the payload into a concrete type.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }

    /// Age of the entry right now. `None` when no write time was recorded.
    pub fn time_diff(&self) -> Option<TimeDiff> {
        self.time.map(|time| TimeDiff::between(time, Utc::now()))
    }
}

/// Elapsed time since an entry was written, in every unit at once.
///
/// Each field is derived from the previous one by a fixed divisor
/// (1000, 60, 60, 24, 30, 12), and none are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct TimeDiff {
    pub seconds_ago: f64,
    pub minutes_ago: f64,
    pub hours_ago: f64,
    pub days_ago: f64,
    pub months_ago: f64,
    pub years_ago: f64,
}

impl TimeDiff {
    /// Time elapsed from `from` to `to`. Negative if `to` is earlier (clock skew).
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self::from_millis((to - from).num_milliseconds() as f64)
    }

    pub fn from_millis(millis: f64) -> Self {
        let seconds_ago = millis / MS_PER_SECOND;
        let minutes_ago = seconds_ago / SECONDS_PER_MINUTE;
        let hours_ago = minutes_ago / MINUTES_PER_HOUR;
        let days_ago = hours_ago / HOURS_PER_DAY;
        let months_ago = days_ago / DAYS_PER_MONTH;
        let years_ago = months_ago / MONTHS_PER_YEAR;
        Self {
            seconds_ago,
            minutes_ago,
            hours_ago,
            days_ago,
            months_ago,
            years_ago,
        }
    }
}

/// Entry timestamps in the shape a browser `Date` serializes to
/// (`2024-05-01T12:00:00.000Z`).
///
/// Reading is lenient: RFC 3339 strings and epoch milliseconds are accepted,
/// anything else loads as "no recorded time" instead of failing the slot.
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(
        time: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => {
                serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw.and_then(|value| match value {
            Value::String(s) => DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
            _ => None,
        }))
    }
}
