// Configuration loading and validation
use serde::Deserialize;

use crate::domain::level::Thresholds;

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    pub api: ApiSettings,
    #[serde(default)]
    pub poll: PollSettings,
    #[serde(default)]
    pub tank: TankSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollSettings {
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
    #[serde(default = "default_offline_after_ms")]
    pub offline_after_ms: u64,
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    #[serde(default = "default_history_points")]
    pub history_points: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TankSettings {
    #[serde(default = "default_total_volume")]
    pub total_volume: f64,
    #[serde(default = "default_low_threshold")]
    pub low_alert_threshold: f64,
    #[serde(default = "default_high_threshold")]
    pub high_alert_threshold: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_refresh_ms() -> u64 {
    5000
}

fn default_offline_after_ms() -> u64 {
    30000
}

fn default_history_days() -> u32 {
    1
}

fn default_history_points() -> usize {
    50
}

fn default_total_volume() -> f64 {
    1000.0
}

fn default_low_threshold() -> f64 {
    20.0
}

fn default_high_threshold() -> f64 {
    90.0
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            refresh_ms: default_refresh_ms(),
            offline_after_ms: default_offline_after_ms(),
            history_days: default_history_days(),
            history_points: default_history_points(),
        }
    }
}

impl Default for TankSettings {
    fn default() -> Self {
        Self {
            total_volume: default_total_volume(),
            low_alert_threshold: default_low_threshold(),
            high_alert_threshold: default_high_threshold(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl TankSettings {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            low: self.low_alert_threshold,
            high: self.high_alert_threshold,
        }
    }

    /// Reject unusable tank settings. All violations are reported together.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut errors = Vec::new();

        if !(self.total_volume > 0.0) {
            errors.push("total volume must be a positive number");
        }
        if !(0.0..=100.0).contains(&self.low_alert_threshold) {
            errors.push("low alert threshold must be between 0 and 100");
        }
        if !(0.0..=100.0).contains(&self.high_alert_threshold) {
            errors.push("high alert threshold must be between 0 and 100");
        }
        if self.low_alert_threshold >= self.high_alert_threshold {
            errors.push("low alert threshold must be below the high alert threshold");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("invalid tank settings: {}", errors.join("; "))
        }
    }
}

pub fn load_monitor_config() -> anyhow::Result<MonitorConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/monitor"))
        .build()?;

    let monitor: MonitorConfig = settings.try_deserialize()?;
    monitor.tank.validate()?;
    Ok(monitor)
}
