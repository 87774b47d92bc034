// Sensor reading domain models
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacAction {
    Heating,
    Cooling,
    Idle,
    Off,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    Heat,
    Cool,
    HeatCool,
    Auto,
    Off,
    #[serde(other)]
    Unknown,
}

/// One sample of one sensor, as delivered by the readings endpoint.
///
/// The timestamp is kept as the raw ISO-8601 string; it is parsed when the
/// reading is aligned so a single bad value only costs that reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub hvac_action: Option<HvacAction>,
    #[serde(default)]
    pub hvac_mode: Option<HvacMode>,
    #[serde(default)]
    pub setpoint_heat: Option<f64>,
    #[serde(default)]
    pub setpoint_cool: Option<f64>,
    #[serde(default)]
    pub fan_mode: Option<String>,
}

impl Reading {
    pub fn new(timestamp: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
            hvac_action: None,
            hvac_mode: None,
            setpoint_heat: None,
            setpoint_cool: None,
            fan_mode: None,
        }
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// All readings of one sensor for one refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSeries {
    pub sensor_id: i64,
    pub entity_id: String,
    pub friendly_name: String,
    #[serde(default)]
    pub zone_id: Option<i64>,
    #[serde(default)]
    pub zone_color: Option<String>,
    #[serde(default)]
    pub is_outdoor: bool,
    #[serde(default)]
    pub readings: Vec<Reading>,
}

impl SensorSeries {
    pub fn new(sensor_id: i64, entity_id: impl Into<String>, zone_id: Option<i64>) -> Self {
        let entity_id = entity_id.into();
        Self {
            sensor_id,
            friendly_name: entity_id.clone(),
            entity_id,
            zone_id,
            zone_color: None,
            is_outdoor: false,
            readings: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.zone_color = Some(color.into());
        self
    }

    pub fn outdoor(mut self) -> Self {
        self.is_outdoor = true;
        self
    }

    pub fn with_readings(mut self, readings: Vec<Reading>) -> Self {
        self.readings = readings;
        self
    }
}

/// Weather service observation used as the outdoor reference series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub timestamp: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub dewpoint: Option<f64>,
    #[serde(default)]
    pub heat_index: Option<f64>,
}

impl WeatherObservation {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            source: None,
            temperature: None,
            humidity: None,
            wind_speed: None,
            condition: None,
            pressure: None,
            dewpoint: None,
            heat_index: None,
        }
    }

    /// Value of the measurement matching a sensor device class, if the
    /// weather service reports one.
    pub fn measurement(&self, device_class: &str) -> Option<f64> {
        match device_class {
            "temperature" => self.temperature,
            "humidity" => self.humidity,
            "pressure" => self.pressure,
            _ => None,
        }
    }
}

/// Parse an ISO-8601 timestamp into UTC.
///
/// Strings with an offset are converted; offset-less strings are taken as UTC,
/// which is how the backend stores them.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_with_offset() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 5, 15, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-05T10:00:00-05:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-05T15:00:00Z"), Some(expected));
    }

    #[test]
    fn test_parse_naive_timestamp_as_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-05T10:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-05T10:00:00.000000"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-05 10:00:00"), Some(expected));
    }

    #[test]
    fn test_parse_malformed_timestamp() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024-13-40T10:00:00"), None);
    }

    #[test]
    fn test_deserialize_backend_payload() {
        let json = r#"{
            "sensor_id": 3,
            "entity_id": "climate.upstairs",
            "friendly_name": "Upstairs",
            "zone_id": 2,
            "zone_color": null,
            "is_outdoor": false,
            "readings": [{
                "timestamp": "2024-01-05T10:00:00",
                "value": 71.5,
                "hvac_action": "cooling",
                "hvac_mode": "heat_cool",
                "setpoint_heat": 68.0,
                "setpoint_cool": 74.0,
                "fan_mode": "auto"
            }, {
                "timestamp": "2024-01-05T10:05:00",
                "value": null,
                "hvac_action": "defrosting"
            }]
        }"#;

        let series: SensorSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.zone_id, Some(2));
        assert_eq!(series.readings.len(), 2);
        assert_eq!(series.readings[0].hvac_action, Some(HvacAction::Cooling));
        assert_eq!(series.readings[0].hvac_mode, Some(HvacMode::HeatCool));
        assert_eq!(series.readings[1].hvac_action, Some(HvacAction::Unknown));
        assert_eq!(series.readings[1].value, None);
    }

    #[test]
    fn test_weather_measurement_by_device_class() {
        let mut obs = WeatherObservation::new("2024-01-05T10:00:00");
        obs.temperature = Some(41.0);
        obs.humidity = Some(80.0);

        assert_eq!(obs.measurement("temperature"), Some(41.0));
        assert_eq!(obs.measurement("humidity"), Some(80.0));
        assert_eq!(obs.measurement("co2"), None);
    }
}
