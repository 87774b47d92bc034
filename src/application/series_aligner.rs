// Series aligner - Merges per-sensor streams into one zone-keyed series
use crate::domain::chart::{round_one_decimal, zone_key, AlignedPoint, ChartLine, OUTDOOR_KEY};
use crate::domain::reading::{parse_timestamp, SensorSeries, WeatherObservation};
use crate::domain::zone::{ZoneRegistry, DEFAULT_ZONE_COLOR};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const DEFAULT_OUTDOOR_COLOR: &str = "#f59e0b";
const OUTDOOR_LINE_NAME: &str = "Outdoor";

/// Where a zone line takes its color from first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSource {
    /// First member sensor that supplies a color, then the registry.
    #[default]
    Sensor,
    /// Registry color, then the first member sensor color.
    Registry,
}

type InstantIndex = HashMap<DateTime<Utc>, Option<f64>>;

struct ZoneGroup {
    sensor_color: Option<String>,
    is_outdoor: bool,
    members: Vec<InstantIndex>,
}

#[derive(Debug, Clone)]
pub struct SeriesAligner {
    color_source: ColorSource,
    default_color: String,
    outdoor_color: String,
}

impl Default for SeriesAligner {
    fn default() -> Self {
        Self {
            color_source: ColorSource::default(),
            default_color: DEFAULT_ZONE_COLOR.to_string(),
            outdoor_color: DEFAULT_OUTDOOR_COLOR.to_string(),
        }
    }
}

impl SeriesAligner {
    pub fn new(color_source: ColorSource, default_color: String, outdoor_color: String) -> Self {
        Self {
            color_source,
            default_color,
            outdoor_color,
        }
    }

    /// Align zoned sensor series on the union of their timestamps.
    ///
    /// Each point holds, per zone, the mean of the member sensors that have a
    /// value at exactly that instant. Series without a zone are ignored.
    pub fn align(
        &self,
        series: &[SensorSeries],
        zones: &ZoneRegistry,
    ) -> (Vec<AlignedPoint>, Vec<ChartLine>) {
        self.align_with_weather(series, zones, &[], "")
    }

    /// Same as [`align`](Self::align), with the weather service measurement
    /// matching `device_class` added under the `outdoor` key.
    pub fn align_with_weather(
        &self,
        series: &[SensorSeries],
        zones: &ZoneRegistry,
        weather: &[WeatherObservation],
        device_class: &str,
    ) -> (Vec<AlignedPoint>, Vec<ChartLine>) {
        let mut timestamps = BTreeSet::new();
        let mut groups: BTreeMap<i64, ZoneGroup> = BTreeMap::new();

        for sensor in series {
            let Some(zone_id) = sensor.zone_id else {
                tracing::debug!("Ignoring unzoned sensor {}", sensor.entity_id);
                continue;
            };

            let index = index_readings(sensor, &mut timestamps);
            let group = groups.entry(zone_id).or_insert_with(|| ZoneGroup {
                sensor_color: None,
                is_outdoor: false,
                members: Vec::new(),
            });
            if group.sensor_color.is_none() {
                group.sensor_color = sensor.zone_color.clone();
            }
            group.is_outdoor |= sensor.is_outdoor;
            group.members.push(index);
        }

        let reference = index_weather(weather, device_class, &mut timestamps);
        let has_reference = !reference.is_empty();

        let points: Vec<AlignedPoint> = timestamps
            .into_iter()
            .map(|ts| {
                let mut point = AlignedPoint::new(ts);
                for (zone_id, group) in &groups {
                    if let Some(mean) = mean_at(&group.members, &ts) {
                        point.values.insert(zone_key(*zone_id), mean);
                    }
                }
                if let Some(value) = reference.get(&ts) {
                    point.values.insert(OUTDOOR_KEY.to_string(), round_one_decimal(*value));
                }
                point
            })
            .collect();

        let mut lines: Vec<ChartLine> = groups
            .iter()
            .map(|(zone_id, group)| {
                ChartLine::new(
                    zone_key(*zone_id),
                    zones.display_name(*zone_id),
                    self.resolve_color(*zone_id, group, zones),
                    group.is_outdoor,
                )
            })
            .collect();

        if has_reference {
            lines.push(ChartLine::new(
                OUTDOOR_KEY.to_string(),
                OUTDOOR_LINE_NAME.to_string(),
                self.outdoor_color.clone(),
                true,
            ));
        }

        tracing::debug!(
            "Aligned {} series into {} zones over {} timestamps",
            series.len(),
            groups.len(),
            points.len()
        );

        (points, lines)
    }

    fn resolve_color(&self, zone_id: i64, group: &ZoneGroup, zones: &ZoneRegistry) -> String {
        let sensor = group.sensor_color.as_deref();
        let registry = zones.color(zone_id);
        let preferred = match self.color_source {
            ColorSource::Sensor => sensor.or(registry),
            ColorSource::Registry => registry.or(sensor),
        };
        preferred.unwrap_or(self.default_color.as_str()).to_string()
    }
}

/// Index one sensor's readings by instant. The first reading at an instant
/// wins; readings with unparsable timestamps are dropped.
fn index_readings(sensor: &SensorSeries, timestamps: &mut BTreeSet<DateTime<Utc>>) -> InstantIndex {
    let mut index = HashMap::with_capacity(sensor.readings.len());
    for reading in &sensor.readings {
        match reading.instant() {
            Some(ts) => {
                timestamps.insert(ts);
                index.entry(ts).or_insert(reading.value);
            }
            None => {
                tracing::warn!(
                    "Dropping reading of {} with unparsable timestamp {:?}",
                    sensor.entity_id,
                    reading.timestamp
                );
            }
        }
    }
    index
}

/// Index weather values by instant. The first observation at an instant that
/// carries the measurement wins; observations without it add no timestamp.
fn index_weather(
    weather: &[WeatherObservation],
    device_class: &str,
    timestamps: &mut BTreeSet<DateTime<Utc>>,
) -> HashMap<DateTime<Utc>, f64> {
    let mut index = HashMap::with_capacity(weather.len());
    for obs in weather {
        match parse_timestamp(&obs.timestamp) {
            Some(ts) => {
                if let Some(value) = obs.measurement(device_class) {
                    timestamps.insert(ts);
                    index.entry(ts).or_insert(value);
                }
            }
            None => {
                tracing::warn!(
                    "Dropping weather observation with unparsable timestamp {:?}",
                    obs.timestamp
                );
            }
        }
    }
    index
}

/// Values are summed in sorted order so the result does not depend on the
/// order the sensors arrived in.
fn mean_at(members: &[InstantIndex], ts: &DateTime<Utc>) -> Option<f64> {
    let mut present: Vec<f64> = members
        .iter()
        .filter_map(|m| m.get(ts).copied().flatten())
        .collect();
    if present.is_empty() {
        return None;
    }

    present.sort_by(f64::total_cmp);
    let sum: f64 = present.iter().sum();
    Some(round_one_decimal(sum / present.len() as f64))
}
