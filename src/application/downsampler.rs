// Downsampler - Bounds point counts and assigns axis labels
use crate::domain::chart::{AlignedPoint, TimeScale};
use chrono::{FixedOffset, Offset, Utc};

pub const DEFAULT_MAX_POINTS: usize = 500;

#[derive(Debug, Clone)]
pub struct Downsampler {
    max_points: usize,
    offset: FixedOffset,
}

impl Default for Downsampler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POINTS, utc())
    }
}

impl Downsampler {
    pub fn new(max_points: usize, offset: FixedOffset) -> Self {
        Self { max_points, offset }
    }

    pub fn label_and_bound(&self, points: Vec<AlignedPoint>, span_hours: f64) -> Vec<AlignedPoint> {
        label_and_bound(points, span_hours, self.max_points, &self.offset)
    }
}

/// Decimate `points` to at most `max_points` and label the survivors with
/// the format for `span_hours`, rendered at `offset`.
pub fn label_and_bound(
    points: Vec<AlignedPoint>,
    span_hours: f64,
    max_points: usize,
    offset: &FixedOffset,
) -> Vec<AlignedPoint> {
    let scale = TimeScale::for_span_hours(span_hours);
    let before = points.len();

    let mut bounded = decimate(points, max_points);
    for point in &mut bounded {
        point.display_label = scale.format(&point.timestamp, offset);
    }

    if bounded.len() < before {
        tracing::debug!(
            "Decimated {} points to {} (max {})",
            before,
            bounded.len(),
            max_points
        );
    }

    bounded
}

/// Stride for keeping at most `max_points` of `len` items.
pub fn stride(len: usize, max_points: usize) -> usize {
    let max_points = max_points.max(1);
    if len <= max_points {
        1
    } else {
        len.div_ceil(max_points)
    }
}

/// Keep every item whose index is a multiple of the stride. The first item is
/// always kept and order is preserved; input at or under the limit is
/// returned unchanged.
pub fn decimate<T>(items: Vec<T>, max_points: usize) -> Vec<T> {
    let step = stride(items.len(), max_points);
    if step == 1 {
        return items;
    }

    items.into_iter().step_by(step).collect()
}

fn utc() -> FixedOffset {
    Utc.fix()
}
