// Chart-ready aligned series domain models
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::BTreeMap;

/// Value-map key of the weather service reference series.
pub const OUTDOOR_KEY: &str = "outdoor";

pub fn zone_key(zone_id: i64) -> String {
    format!("zone_{}", zone_id)
}

/// Round to one decimal place, the precision every chart value is shown at.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One synthesized point per distinct timestamp.
///
/// A key missing from `values` means no data for that series at this instant,
/// which the renderer draws as a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPoint {
    pub timestamp: DateTime<Utc>,
    pub display_label: String,
    pub values: BTreeMap<String, f64>,
}

impl AlignedPoint {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            display_label: String::new(),
            values: BTreeMap::new(),
        }
    }

    pub fn zone_value(&self, zone_id: i64) -> Option<f64> {
        self.values.get(&zone_key(zone_id)).copied()
    }

    pub fn outdoor_value(&self) -> Option<f64> {
        self.values.get(OUTDOOR_KEY).copied()
    }
}

/// Which series to draw and how.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub key: String,
    pub display_name: String,
    pub color: String,
    pub is_outdoor: bool,
}

impl ChartLine {
    pub fn new(key: String, display_name: String, color: String, is_outdoor: bool) -> Self {
        Self {
            key,
            display_name,
            color,
            is_outdoor,
        }
    }
}

/// X-axis label granularity, chosen from the requested span rather than the
/// number of points actually returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeScale {
    /// Up to a day: `14:05`
    TimeOfDay,
    /// Up to a week: `Mon 14:05`
    WeekdayTime,
    /// Longer: `Jan 5`
    MonthDay,
}

impl TimeScale {
    pub const DAY_HOURS: f64 = 24.0;
    pub const WEEK_HOURS: f64 = 168.0;

    pub fn for_span_hours(span_hours: f64) -> Self {
        if span_hours <= Self::DAY_HOURS {
            TimeScale::TimeOfDay
        } else if span_hours <= Self::WEEK_HOURS {
            TimeScale::WeekdayTime
        } else {
            TimeScale::MonthDay
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            TimeScale::TimeOfDay => "%H:%M",
            TimeScale::WeekdayTime => "%a %H:%M",
            TimeScale::MonthDay => "%b %-d",
        }
    }

    pub fn format(self, timestamp: &DateTime<Utc>, offset: &FixedOffset) -> String {
        timestamp
            .with_timezone(offset)
            .format(self.pattern())
            .to_string()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeScale::TimeOfDay => "timeOfDay",
            TimeScale::WeekdayTime => "weekdayTime",
            TimeScale::MonthDay => "monthDay",
        }
    }
}

/// Output of one aggregation call.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedChart {
    pub scale: TimeScale,
    pub points: Vec<AlignedPoint>,
    pub lines: Vec<ChartLine>,
}

impl AlignedChart {
    pub fn new(scale: TimeScale, points: Vec<AlignedPoint>, lines: Vec<ChartLine>) -> Self {
        Self {
            scale,
            points,
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_scale_boundaries() {
        assert_eq!(TimeScale::for_span_hours(1.0), TimeScale::TimeOfDay);
        assert_eq!(TimeScale::for_span_hours(24.0), TimeScale::TimeOfDay);
        assert_eq!(TimeScale::for_span_hours(24.5), TimeScale::WeekdayTime);
        assert_eq!(TimeScale::for_span_hours(168.0), TimeScale::WeekdayTime);
        assert_eq!(TimeScale::for_span_hours(169.0), TimeScale::MonthDay);
        assert_eq!(TimeScale::for_span_hours(8760.0), TimeScale::MonthDay);
    }

    #[test]
    fn test_scale_formats() {
        let utc = FixedOffset::east_opt(0).unwrap();
        // 2024-01-05 is a Friday
        let ts = Utc.with_ymd_and_hms(2024, 1, 5, 14, 5, 0).unwrap();

        assert_eq!(TimeScale::TimeOfDay.format(&ts, &utc), "14:05");
        assert_eq!(TimeScale::WeekdayTime.format(&ts, &utc), "Fri 14:05");
        assert_eq!(TimeScale::MonthDay.format(&ts, &utc), "Jan 5");
    }

    #[test]
    fn test_format_in_local_offset() {
        let central = FixedOffset::west_opt(6 * 3600).unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 1, 5, 3, 30, 0).unwrap();

        assert_eq!(TimeScale::TimeOfDay.format(&ts, &central), "21:30");
        assert_eq!(TimeScale::WeekdayTime.format(&ts, &central), "Thu 21:30");
        assert_eq!(TimeScale::MonthDay.format(&ts, &central), "Jan 4");
    }

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(72.0), 72.0);
        assert_eq!(round_one_decimal(71.25), 71.3);
        assert_eq!(round_one_decimal(70.333333), 70.3);
    }
}
