// Snapshot source - Replays recorded backend responses from JSON files
use crate::application::readings_source::ReadingsSource;
use crate::domain::reading::{parse_timestamp, SensorSeries, WeatherObservation};
use crate::domain::time_range::{ReadingsQuery, TimeRange};
use crate::domain::zone::Zone;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot {} not found", path.display())]
    Missing { path: PathBuf },
    #[error("failed to read snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode snapshot {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Reads `readings[_{device_class}].json`, `zones.json` and `weather.json`
/// from one directory. The window end is the newest reading timestamp, so old
/// recordings replay as if they were live.
#[derive(Debug, Clone)]
pub struct JsonSnapshotSource {
    dir: PathBuf,
}

impl JsonSnapshotSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn readings_file(device_class: Option<&str>) -> String {
        match device_class {
            Some(class) => format!("readings_{}.json", class),
            None => "readings.json".to_string(),
        }
    }

    async fn load_readings(&self, device_class: Option<&str>) -> Result<Vec<SensorSeries>, SnapshotError> {
        let name = Self::readings_file(device_class);
        let series: Vec<SensorSeries> = self.read_json(&name).await?.ok_or_else(|| {
            SnapshotError::Missing {
                path: self.dir.join(&name),
            }
        })?;

        tracing::debug!("Loaded {} series from {}", series.len(), name);
        Ok(series)
    }

    async fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, SnapshotError> {
        let path = self.dir.join(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(SnapshotError::Io { path, source }),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| SnapshotError::Decode { path, source })
    }
}

#[async_trait]
impl ReadingsSource for JsonSnapshotSource {
    async fn sensor_readings(&self, query: &ReadingsQuery) -> anyhow::Result<Vec<SensorSeries>> {
        let series = self.load_readings(query.device_class.as_deref()).await?;
        Ok(window_readings(series, &query.range))
    }

    async fn window_end(&self, query: &ReadingsQuery) -> anyhow::Result<DateTime<Utc>> {
        let series = self.load_readings(query.device_class.as_deref()).await?;
        Ok(newest(reading_stamps(&series)).unwrap_or_else(Utc::now))
    }

    async fn zones(&self) -> anyhow::Result<Vec<Zone>> {
        let mut zones: Vec<Zone> = self.read_json("zones.json").await?.unwrap_or_default();
        zones.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
        Ok(zones)
    }

    async fn weather_history(&self, range: &TimeRange) -> anyhow::Result<Vec<WeatherObservation>> {
        let weather: Vec<WeatherObservation> =
            self.read_json("weather.json").await?.unwrap_or_default();

        let Some(now) = newest(weather.iter().map(|w| w.timestamp.as_str())) else {
            return Ok(weather);
        };
        Ok(weather
            .into_iter()
            .filter(|w| in_window(&w.timestamp, range, now))
            .collect())
    }
}

fn newest<'a>(stamps: impl Iterator<Item = &'a str>) -> Option<DateTime<Utc>> {
    stamps.filter_map(parse_timestamp).max()
}

/// Unparsable timestamps are kept so the aligner reports them.
fn in_window(raw: &str, range: &TimeRange, now: DateTime<Utc>) -> bool {
    match parse_timestamp(raw) {
        Some(ts) => range.contains(now, ts),
        None => true,
    }
}

fn reading_stamps(series: &[SensorSeries]) -> impl Iterator<Item = &str> {
    series
        .iter()
        .flat_map(|s| s.readings.iter().map(|r| r.timestamp.as_str()))
}

fn window_readings(mut series: Vec<SensorSeries>, range: &TimeRange) -> Vec<SensorSeries> {
    let Some(now) = newest(reading_stamps(&series)) else {
        return series;
    };

    for sensor in &mut series {
        sensor.readings.retain(|r| in_window(&r.timestamp, range, now));
    }
    series
}
