// Level classification against configured alert thresholds
use serde::Serialize;

/// Alert thresholds in percent of tank capacity. Invariant: `low < high`,
/// both within [0, 100]; enforced at configuration load.
#[derive(Debug, Clone)]
pub struct Thresholds {
    pub low: f64,
    pub high: f64,
}

/// Level classification bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelBucket {
    Low,
    Normal,
    High,
}

/// An active alert condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alert {
    Low,
    High,
}

impl Alert {
    pub fn message(&self) -> &'static str {
        match self {
            Alert::Low => "Water level at or below the low alert threshold",
            Alert::High => "Water level at or above the high alert threshold",
        }
    }
}

/// Classify a level percentage. Boundary values belong to the alert bucket:
/// `percentage <= low` is Low and `percentage >= high` is High. NaN input
/// classifies Normal.
pub fn classify_level(percentage: f64, thresholds: &Thresholds) -> LevelBucket {
    if percentage <= thresholds.low {
        LevelBucket::Low
    } else if percentage >= thresholds.high {
        LevelBucket::High
    } else {
        LevelBucket::Normal
    }
}

/// Derive the active alert, `None` only strictly between the thresholds.
pub fn derive_alert(percentage: f64, thresholds: &Thresholds) -> Option<Alert> {
    match classify_level(percentage, thresholds) {
        LevelBucket::Low => Some(Alert::Low),
        LevelBucket::High => Some(Alert::High),
        LevelBucket::Normal => None,
    }
}
