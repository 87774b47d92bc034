// Mapper to convert aligned charts to the renderer's JSON payload
use crate::domain::chart::{AlignedChart, AlignedPoint, ChartLine};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPayload {
    pub scale: &'static str,
    pub points: Vec<PointPayload>,
    pub lines: Vec<LinePayload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointPayload {
    pub timestamp: DateTime<Utc>,
    pub label: String,
    pub values: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePayload {
    pub key: String,
    pub name: String,
    pub color: String,
    pub is_outdoor: bool,
}

pub fn chart_to_payload(chart: AlignedChart) -> ChartPayload {
    ChartPayload {
        scale: chart.scale.as_str(),
        points: chart.points.into_iter().map(point_to_payload).collect(),
        lines: chart.lines.into_iter().map(line_to_payload).collect(),
    }
}

fn point_to_payload(point: AlignedPoint) -> PointPayload {
    PointPayload {
        timestamp: point.timestamp,
        label: point.display_label,
        values: point.values,
    }
}

fn line_to_payload(line: ChartLine) -> LinePayload {
    LinePayload {
        key: line.key,
        name: line.display_name,
        color: line.color,
        is_outdoor: line.is_outdoor,
    }
}
