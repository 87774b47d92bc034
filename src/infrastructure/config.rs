use crate::application::downsampler::{Downsampler, DEFAULT_MAX_POINTS};
use crate::application::series_aligner::{ColorSource, SeriesAligner, DEFAULT_OUTDOOR_COLOR};
use crate::domain::reading::parse_timestamp;
use crate::domain::time_range::{ReadingsQuery, TimeRange};
use crate::domain::zone::DEFAULT_ZONE_COLOR;
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("replay.{field} is not a valid timestamp: {value:?}")]
    InvalidInstant { field: &'static str, value: String },
    #[error(transparent)]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub charts: ChartsConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChartsConfig {
    pub max_points: usize,
    pub default_zone_color: String,
    pub outdoor_color: String,
    pub color_source: ColorSource,
    pub utc_offset_minutes: i32,
    pub include_weather: bool,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            max_points: DEFAULT_MAX_POINTS,
            default_zone_color: DEFAULT_ZONE_COLOR.to_string(),
            outdoor_color: DEFAULT_OUTDOOR_COLOR.to_string(),
            color_source: ColorSource::default(),
            utc_offset_minutes: 0,
            include_weather: true,
        }
    }
}

impl ChartsConfig {
    pub fn aligner(&self) -> SeriesAligner {
        SeriesAligner::new(
            self.color_source,
            self.default_zone_color.clone(),
            self.outdoor_color.clone(),
        )
    }

    pub fn downsampler(&self) -> Downsampler {
        Downsampler::new(self.max_points, self.label_offset())
    }

    /// Offset labels are rendered in. Out-of-range values fall back to UTC.
    pub fn label_offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                tracing::warn!(
                    "Invalid charts.utc_offset_minutes {}, using UTC",
                    self.utc_offset_minutes
                );
                Utc.fix()
            })
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReplayConfig {
    pub snapshot_dir: PathBuf,
    pub hours: u32,
    pub start: Option<String>,
    pub end: Option<String>,
    pub device_class: Option<String>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from("snapshots"),
            hours: 24,
            start: None,
            end: None,
            device_class: Some("temperature".to_string()),
        }
    }
}

impl ReplayConfig {
    /// An explicit start/end pair takes precedence over the lookback window.
    pub fn query(&self) -> Result<ReadingsQuery, ConfigError> {
        let range = match (&self.start, &self.end) {
            (Some(start), Some(end)) => TimeRange::Between {
                start: parse_instant("start", start)?,
                end: parse_instant("end", end)?,
            },
            _ => TimeRange::last_hours(self.hours),
        };

        let query = ReadingsQuery::new(range);
        Ok(match self.device_class.as_deref() {
            Some(class) if !class.is_empty() => query.with_device_class(class),
            _ => query,
        })
    }
}

fn parse_instant(field: &'static str, value: &str) -> Result<chrono::DateTime<Utc>, ConfigError> {
    parse_timestamp(value).ok_or_else(|| ConfigError::InvalidInstant {
        field,
        value: value.to_string(),
    })
}

/// Load `config/climate.*` overlaid with `CLIMATE__SECTION__KEY` variables.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/climate").required(false))
        .add_source(
            config::Environment::with_prefix("CLIMATE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn from_toml(source: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let cfg = from_toml("");

        assert_eq!(cfg.charts.max_points, 500);
        assert_eq!(cfg.charts.default_zone_color, "#06b6d4");
        assert_eq!(cfg.charts.color_source, ColorSource::Sensor);
        assert!(cfg.charts.include_weather);
        assert_eq!(cfg.replay.hours, 24);
        assert_eq!(cfg.replay.device_class.as_deref(), Some("temperature"));
    }

    #[test]
    fn test_partial_sections() {
        let cfg = from_toml(
            r#"
            [charts]
            max_points = 250
            color_source = "registry"
            utc_offset_minutes = -360

            [replay]
            hours = 168
            device_class = "humidity"
            "#,
        );

        assert_eq!(cfg.charts.max_points, 250);
        assert_eq!(cfg.charts.color_source, ColorSource::Registry);
        assert_eq!(cfg.charts.outdoor_color, DEFAULT_OUTDOOR_COLOR);
        assert_eq!(
            cfg.charts.label_offset(),
            FixedOffset::west_opt(6 * 3600).unwrap()
        );

        let query = cfg.replay.query().unwrap();
        assert_eq!(query.range, TimeRange::last_hours(168));
        assert_eq!(query.device_class.as_deref(), Some("humidity"));
    }

    #[test]
    fn test_invalid_offset_falls_back_to_utc() {
        let charts = ChartsConfig {
            utc_offset_minutes: 100_000,
            ..ChartsConfig::default()
        };
        assert_eq!(charts.label_offset(), Utc.fix());
    }

    #[test]
    fn test_replay_explicit_window() {
        let replay = ReplayConfig {
            start: Some("2024-01-01T00:00:00Z".to_string()),
            end: Some("2024-01-15T00:00:00Z".to_string()),
            device_class: None,
            ..ReplayConfig::default()
        };
        let query = replay.query().unwrap();

        assert_eq!(
            query.range,
            TimeRange::Between {
                start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            }
        );
        assert_eq!(query.range.span_hours(), 336.0);
        assert_eq!(query.device_class, None);
    }

    #[test]
    fn test_replay_start_without_end_uses_lookback() {
        let replay = ReplayConfig {
            start: Some("2024-01-01T00:00:00Z".to_string()),
            hours: 6,
            ..ReplayConfig::default()
        };
        assert_eq!(replay.query().unwrap().range, TimeRange::last_hours(6));
    }

    #[test]
    fn test_replay_bad_instant() {
        let replay = ReplayConfig {
            start: Some("last tuesday".to_string()),
            end: Some("2024-01-15T00:00:00Z".to_string()),
            ..ReplayConfig::default()
        };

        let err = replay.query().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInstant { field: "start", .. }));
    }
}
