// Telemetry reading domain model
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Connectivity status as reported by the sensor itself, independent of
/// whether the monitor API is reachable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    Online,
    Offline,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One telemetry sample.
///
/// Field names drifted across API revisions; deserialization accepts the
/// observed aliases and canonicalizes them. Missing numeric fields default
/// to 0, missing timestamps stay absent. Values are not clamped: a level
/// above 100 is an overflow condition, a negative one a sensor fault, and
/// both must survive into the derived state untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reading {
    #[serde(alias = "percent", alias = "level_percent", alias = "nivel_percent", default)]
    pub level_percentage: f64,
    #[serde(alias = "volume", default)]
    pub volume_liters: f64,
    #[serde(alias = "distancia_cm", default)]
    pub distance_cm: f64,
    #[serde(alias = "ts", alias = "hora", default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub status: SensorStatus,
}

impl Reading {
    /// Source timestamp as epoch milliseconds, if it parses.
    pub fn timestamp_ms(&self) -> Option<i64> {
        self.timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .map(|dt| dt.timestamp_millis())
    }
}

/// Parse a source-supplied timestamp.
///
/// The monitor API emits naive ISO 8601 timestamps, some revisions RFC 3339
/// with an offset. Naive timestamps are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_canonical_field_names() {
        let reading: Reading = serde_json::from_str(
            r#"{"level_percentage": 42.5, "volume_liters": 425.0, "distance_cm": 57.5,
                "timestamp": "2024-06-01T10:30:00", "status": "online"}"#,
        )
        .unwrap();

        assert_eq!(reading.level_percentage, 42.5);
        assert_eq!(reading.volume_liters, 425.0);
        assert_eq!(reading.distance_cm, 57.5);
        assert_eq!(reading.status, SensorStatus::Online);
    }

    #[test]
    fn deserializes_legacy_aliases() {
        let reading: Reading = serde_json::from_str(
            r#"{"percent": 15.0, "volume": 150.0, "distancia_cm": 85.0, "ts": "2024-06-01T10:30:00"}"#,
        )
        .unwrap();

        assert_eq!(reading.level_percentage, 15.0);
        assert_eq!(reading.volume_liters, 150.0);
        assert_eq!(reading.distance_cm, 85.0);
        assert_eq!(reading.timestamp.as_deref(), Some("2024-06-01T10:30:00"));
    }

    #[test]
    fn missing_fields_default_to_zero_and_unknown() {
        let reading: Reading = serde_json::from_str(r#"{"level_percentage": 10.0}"#).unwrap();

        assert_eq!(reading.volume_liters, 0.0);
        assert_eq!(reading.distance_cm, 0.0);
        assert!(reading.timestamp.is_none());
        assert_eq!(reading.status, SensorStatus::Unknown);
    }

    #[test]
    fn unrecognized_status_maps_to_unknown() {
        let reading: Reading =
            serde_json::from_str(r#"{"status": "rebooting"}"#).unwrap();
        assert_eq!(reading.status, SensorStatus::Unknown);
    }

    #[test]
    fn parses_naive_and_offset_timestamps() {
        let naive = parse_timestamp("2024-06-01T10:30:00.123456").unwrap();
        assert_eq!(naive.timestamp_millis(), 1717237800123);

        let offset = parse_timestamp("2024-06-01T10:30:00+02:00").unwrap();
        assert_eq!(offset.timestamp_millis(), 1717230600000);

        assert!(parse_timestamp("not a date").is_none());
    }
}
