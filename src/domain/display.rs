// Derived display state handed to the UI collaborator
use serde::Serialize;

use crate::domain::format::{fmt_distance, fmt_liters, fmt_percent, fmt_timestamp};
use crate::domain::level::{classify_level, derive_alert, Alert, LevelBucket, Thresholds};
use crate::domain::reading::{Reading, SensorStatus};

const NO_ALERT_TEXT: &str = "No active alert";

/// Everything the dashboard needs to render the current reading.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayState {
    pub bucket: LevelBucket,
    pub alert: Option<Alert>,
    pub alert_text: String,
    pub online: bool,
    pub source_status: SensorStatus,
    pub percent_text: String,
    pub volume_text: String,
    pub distance_text: String,
    pub capacity_text: String,
    pub updated_text: String,
}

impl DisplayState {
    /// Reduce the latest reading to display state. With no reading yet the
    /// view is neutral: Normal bucket, no alert, unknown source status.
    pub fn derive(
        latest: Option<&Reading>,
        thresholds: &Thresholds,
        online: bool,
        capacity_liters: f64,
    ) -> Self {
        let (bucket, alert) = match latest {
            Some(reading) => (
                classify_level(reading.level_percentage, thresholds),
                derive_alert(reading.level_percentage, thresholds),
            ),
            None => (LevelBucket::Normal, None),
        };

        Self {
            bucket,
            alert,
            alert_text: alert
                .map(|a| a.message().to_string())
                .unwrap_or_else(|| NO_ALERT_TEXT.to_string()),
            online,
            source_status: latest.map(|r| r.status).unwrap_or_default(),
            percent_text: fmt_percent(latest.map(|r| r.level_percentage)),
            volume_text: fmt_liters(latest.map(|r| r.volume_liters)),
            distance_text: fmt_distance(latest.map(|r| r.distance_cm)),
            capacity_text: fmt_liters(Some(capacity_liters)),
            updated_text: fmt_timestamp(latest.and_then(|r| r.timestamp.as_deref())),
        }
    }
}

/// One chart point. The dashboard chart plots level and volume against the
/// same time axis, so both ride along.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesPoint {
    pub time_ms: i64,
    pub level: f64,
    pub volume: f64,
}

/// The complete published view: current display state plus the chart series.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub state: DisplayState,
    pub series: Vec<SeriesPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> Thresholds {
        Thresholds { low: 20.0, high: 90.0 }
    }

    fn reading(percentage: f64) -> Reading {
        Reading {
            level_percentage: percentage,
            volume_liters: percentage * 10.0,
            distance_cm: 100.0 - percentage,
            timestamp: Some("2024-06-01T10:30:00".to_string()),
            status: SensorStatus::Online,
        }
    }

    #[test]
    fn low_reading_produces_low_alert() {
        let state = DisplayState::derive(Some(&reading(15.0)), &thresholds(), true, 1000.0);
        assert_eq!(state.bucket, LevelBucket::Low);
        assert_eq!(state.alert, Some(Alert::Low));
        assert_eq!(state.alert_text, Alert::Low.message());
    }

    #[test]
    fn high_reading_produces_high_alert() {
        let state = DisplayState::derive(Some(&reading(95.0)), &thresholds(), true, 1000.0);
        assert_eq!(state.bucket, LevelBucket::High);
        assert_eq!(state.alert, Some(Alert::High));
    }

    #[test]
    fn normal_reading_has_no_alert() {
        let state = DisplayState::derive(Some(&reading(50.0)), &thresholds(), true, 1000.0);
        assert_eq!(state.bucket, LevelBucket::Normal);
        assert_eq!(state.alert, None);
        assert_eq!(state.alert_text, "No active alert");
    }

    #[test]
    fn formats_the_reading_for_display() {
        let state = DisplayState::derive(Some(&reading(50.0)), &thresholds(), true, 1000.0);
        assert_eq!(state.percent_text, "50.0%");
        assert_eq!(state.volume_text, "500.0");
        assert_eq!(state.distance_text, "50.0 cm");
        assert_eq!(state.capacity_text, "1000.0");
        assert_eq!(state.updated_text, "01/06/2024 10:30");
    }

    #[test]
    fn view_before_first_sample_is_neutral() {
        let state = DisplayState::derive(None, &thresholds(), false, 1000.0);
        assert_eq!(state.bucket, LevelBucket::Normal);
        assert_eq!(state.alert, None);
        assert!(!state.online);
        assert_eq!(state.source_status, SensorStatus::Unknown);
        assert_eq!(state.percent_text, "0.0%");
        assert_eq!(state.updated_text, "-");
    }
}
