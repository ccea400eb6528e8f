// Display formatting helpers
//
// Total over whatever the wire hands us: missing or NaN numbers render as 0,
// missing or unparseable timestamps as "-". These never panic.
use crate::domain::reading::parse_timestamp;

fn sanitize(value: Option<f64>) -> f64 {
    value.filter(|v| !v.is_nan()).unwrap_or(0.0)
}

/// Level percentage to one decimal, e.g. `"42.5%"`.
pub fn fmt_percent(value: Option<f64>) -> String {
    format!("{:.1}%", sanitize(value))
}

/// Volume in liters to one decimal, e.g. `"750.0"`.
pub fn fmt_liters(value: Option<f64>) -> String {
    format!("{:.1}", sanitize(value))
}

/// Sensor distance to one decimal, e.g. `"57.5 cm"`.
pub fn fmt_distance(value: Option<f64>) -> String {
    format!("{:.1} cm", sanitize(value))
}

/// Source timestamp as `DD/MM/YYYY HH:MM`, or `"-"` when absent or
/// unparseable.
pub fn fmt_timestamp(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
