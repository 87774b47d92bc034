// Application layer - Alignment, decimation and chart use cases
pub mod chart_service;
pub mod downsampler;
pub mod readings_source;
pub mod series_aligner;
