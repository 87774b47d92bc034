// Main entry point - Replays a readings snapshot through the chart pipeline
use std::sync::Arc;

use climate_telemetry::application::chart_service::ChartService;
use climate_telemetry::infrastructure::chart_mapper::chart_to_payload;
use climate_telemetry::infrastructure::config::load_app_config;
use climate_telemetry::infrastructure::snapshot_source::JsonSnapshotSource;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    // Logs go to stderr so stdout stays a clean JSON document
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let app_config = load_app_config()?;
    let query = app_config.replay.query()?;

    // Create snapshot source (infrastructure layer)
    let source = Arc::new(JsonSnapshotSource::new(&app_config.replay.snapshot_dir));
    // Create services (application layer)
    let chart_service = ChartService::new(source.clone(), &app_config.charts);

    tracing::info!(
        "Replaying {} over {:.1}h from {}",
        query.device_class.as_deref().unwrap_or("all sensors"),
        query.range.span_hours(),
        source.dir().display()
    );

    // Build chart and write payload
    let chart = chart_service.zone_chart(&query).await?;
    tracing::info!(
        "Built {} points across {} lines",
        chart.points.len(),
        chart.lines.len()
    );

    println!("{}", serde_json::to_string_pretty(&chart_to_payload(chart))?);

    Ok(())
}
