// Bounded chart-ready history window
use tracing::debug;

use crate::domain::display::SeriesPoint;
use crate::domain::reading::Reading;

/// The most recent readings, bounded to a fixed cap and kept in
/// chronological order for charting.
///
/// The history endpoint returns newest-first (the backend orders by
/// timestamp descending), so `replace` keeps the first `cap` entries and
/// reverses them. The window is rebuilt wholesale on every poll; nothing is
/// accumulated across ticks.
#[derive(Debug)]
pub struct HistoryWindow {
    cap: usize,
    readings: Vec<Reading>,
}

impl HistoryWindow {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            readings: Vec::new(),
        }
    }

    /// Replace the window with a newest-first response.
    pub fn replace(&mut self, mut newest_first: Vec<Reading>) {
        newest_first.truncate(self.cap);
        newest_first.reverse();
        self.readings = newest_first;
    }

    /// The window as chart points, oldest first. Readings whose timestamp
    /// does not parse are dropped from the chart.
    pub fn series(&self) -> Vec<SeriesPoint> {
        self.readings
            .iter()
            .filter_map(|reading| {
                let Some(time_ms) = reading.timestamp_ms() else {
                    debug!(timestamp = ?reading.timestamp, "dropping unchartable reading");
                    return None;
                };
                Some(SeriesPoint {
                    time_ms,
                    level: reading.level_percentage,
                    volume: reading.volume_liters,
                })
            })
            .collect()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    // Newest-first, like the history endpoint: index 0 is the most recent.
    fn newest_first(count: usize) -> Vec<Reading> {
        (0..count)
            .map(|i| {
                let minutes_ago = i as i64;
                Reading {
                    level_percentage: i as f64,
                    volume_liters: 0.0,
                    distance_cm: 0.0,
                    timestamp: Some(format!("2024-06-01T10:{:02}:00", 59 - minutes_ago.min(59))),
                    status: Default::default(),
                }
            })
            .collect()
    }

    #[test]
    fn truncates_to_the_cap_keeping_the_most_recent() {
        let mut window = HistoryWindow::new(50);
        window.replace(newest_first(120));

        assert_eq!(window.readings.len(), 50);
        // Most recent reading (level 0.0) must be last after the reversal.
        assert_eq!(window.readings.last().unwrap().level_percentage, 0.0);
        assert_eq!(window.readings.first().unwrap().level_percentage, 49.0);
    }

    #[test]
    fn series_is_chronological() {
        let mut window = HistoryWindow::new(50);
        window.replace(newest_first(10));

        let series = window.series();
        assert_eq!(series.len(), 10);
        assert!(series.windows(2).all(|pair| pair[0].time_ms <= pair[1].time_ms));
    }

    #[test]
    fn shorter_responses_pass_through() {
        let mut window = HistoryWindow::new(50);
        window.replace(newest_first(3));
        assert_eq!(window.readings.len(), 3);
    }

    #[test]
    fn replace_discards_the_previous_window() {
        let mut window = HistoryWindow::new(50);
        window.replace(newest_first(30));
        window.replace(newest_first(5));
        assert_eq!(window.readings.len(), 5);
    }

    #[test]
    fn unparseable_timestamps_are_dropped_from_the_series() {
        let mut window = HistoryWindow::new(50);
        let mut readings = newest_first(5);
        readings[2].timestamp = None;
        window.replace(readings);

        assert_eq!(window.readings.len(), 5);
        assert_eq!(window.series().len(), 4);
    }
}
