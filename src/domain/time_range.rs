// Requested time window for a chart refresh
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeRange {
    /// The last `hours` hours up to now.
    Lookback { hours: u32 },
    /// An explicit window.
    Between {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl TimeRange {
    pub fn last_hours(hours: u32) -> Self {
        TimeRange::Lookback { hours }
    }

    /// Length of the requested window in hours; a reversed window counts as
    /// zero.
    pub fn span_hours(&self) -> f64 {
        match self {
            TimeRange::Lookback { hours } => f64::from(*hours),
            TimeRange::Between { start, end } => {
                let secs = (*end - *start).num_seconds().max(0);
                secs as f64 / 3600.0
            }
        }
    }

    /// Resolve the window to concrete instants relative to `now`.
    pub fn bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        match self {
            TimeRange::Lookback { hours } => (now - Duration::hours(i64::from(*hours)), now),
            TimeRange::Between { start, end } => (*start, *end),
        }
    }

    /// Pin a lookback window to concrete instants; explicit windows are
    /// returned as-is.
    pub fn resolve(&self, now: DateTime<Utc>) -> TimeRange {
        let (start, end) = self.bounds(now);
        TimeRange::Between { start, end }
    }

    pub fn contains(&self, now: DateTime<Utc>, instant: DateTime<Utc>) -> bool {
        let (start, end) = self.bounds(now);
        instant >= start && instant <= end
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        TimeRange::Lookback { hours: 24 }
    }
}

/// Parameters of one readings request.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingsQuery {
    pub range: TimeRange,
    pub device_class: Option<String>,
}

impl ReadingsQuery {
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            device_class: None,
        }
    }

    pub fn with_device_class(mut self, device_class: impl Into<String>) -> Self {
        self.device_class = Some(device_class.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_span_hours() {
        assert_eq!(TimeRange::last_hours(6).span_hours(), 6.0);

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();
        assert_eq!(TimeRange::Between { start, end }.span_hours(), 60.0);
        assert_eq!(TimeRange::Between { start: end, end: start }.span_hours(), 0.0);
    }

    #[test]
    fn test_lookback_bounds() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let range = TimeRange::last_hours(24);
        let (start, end) = range.bounds(now);

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
        assert_eq!(end, now);
        assert!(range.contains(now, start));
        assert!(!range.contains(now, start - Duration::seconds(1)));
    }

    #[test]
    fn test_resolve_keeps_span() {
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap();
        let resolved = TimeRange::last_hours(24).resolve(now);

        assert_eq!(
            resolved,
            TimeRange::Between {
                start: Utc.with_ymd_and_hms(2024, 1, 4, 10, 0, 0).unwrap(),
                end: now,
            }
        );
        assert_eq!(resolved.span_hours(), 24.0);
        assert_eq!(resolved.resolve(now + Duration::days(3)), resolved);
    }
}
