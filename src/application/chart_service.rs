// Chart service - Use case for building zone charts
use crate::application::downsampler::Downsampler;
use crate::application::readings_source::ReadingsSource;
use crate::application::series_aligner::SeriesAligner;
use crate::domain::chart::{AlignedChart, TimeScale};
use crate::domain::reading::SensorSeries;
use crate::domain::time_range::{ReadingsQuery, TimeRange};
use crate::domain::zone::ZoneRegistry;
use crate::infrastructure::config::ChartsConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct ChartService {
    source: Arc<dyn ReadingsSource>,
    aligner: SeriesAligner,
    downsampler: Downsampler,
    include_weather: bool,
}

impl ChartService {
    pub fn new(source: Arc<dyn ReadingsSource>, charts_config: &ChartsConfig) -> Self {
        Self {
            source,
            aligner: charts_config.aligner(),
            downsampler: charts_config.downsampler(),
            include_weather: charts_config.include_weather,
        }
    }

    /// Fetch readings for `query` and build one aligned, bounded line per zone.
    pub async fn zone_chart(&self, query: &ReadingsQuery) -> anyhow::Result<AlignedChart> {
        // Readings and weather must share one window
        let range = match query.range {
            TimeRange::Lookback { .. } => query.range.resolve(self.source.window_end(query).await?),
            between => between,
        };
        let query = &ReadingsQuery {
            range,
            device_class: query.device_class.clone(),
        };

        let series = self.source.sensor_readings(query).await?;

        // Missing zone names fall back to "Zone {id}", so a registry failure
        // only degrades labels
        let zones = match self.source.zones().await {
            Ok(zones) => ZoneRegistry::new(zones),
            Err(e) => {
                tracing::warn!("Error fetching zones: {}", e);
                ZoneRegistry::default()
            }
        };

        let device_class = query.device_class.as_deref().unwrap_or_default();
        let weather = if self.include_weather && !device_class.is_empty() {
            self.source
                .weather_history(&query.range)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!("Error fetching weather history: {}", e);
                    Vec::new()
                })
        } else {
            Vec::new()
        };

        let zoned: Vec<SensorSeries> = series.into_iter().filter(|s| s.zone_id.is_some()).collect();

        tracing::debug!(
            "Building {} chart from {} zoned series, {} zones, {} weather observations",
            if device_class.is_empty() { "all" } else { device_class },
            zoned.len(),
            zones.len(),
            weather.len()
        );

        let (points, lines) = self
            .aligner
            .align_with_weather(&zoned, &zones, &weather, device_class);

        let span_hours = query.range.span_hours();
        let points = self.downsampler.label_and_bound(points, span_hours);

        Ok(AlignedChart::new(
            TimeScale::for_span_hours(span_hours),
            points,
            lines,
        ))
    }
}
