// Source trait for upstream readings, zones and weather
use crate::domain::reading::{SensorSeries, WeatherObservation};
use crate::domain::time_range::{ReadingsQuery, TimeRange};
use crate::domain::zone::Zone;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait ReadingsSource: Send + Sync {
    /// Readings of tracked sensors within the query window, optionally
    /// restricted to one device class
    async fn sensor_readings(&self, query: &ReadingsQuery) -> anyhow::Result<Vec<SensorSeries>>;

    /// Instant a lookback window ends at. Resolved once per chart so readings
    /// and weather share one window.
    async fn window_end(&self, _query: &ReadingsQuery) -> anyhow::Result<DateTime<Utc>> {
        Ok(Utc::now())
    }

    /// The zone registry
    async fn zones(&self) -> anyhow::Result<Vec<Zone>>;

    /// Weather service observations within the window
    async fn weather_history(&self, range: &TimeRange) -> anyhow::Result<Vec<WeatherObservation>>;
}
