// Infrastructure layer - Configuration, snapshot input and payload mapping
pub mod chart_mapper;
pub mod config;
pub mod snapshot_source;
