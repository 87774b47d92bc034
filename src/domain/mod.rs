// Domain layer - Readings, zones and aligned chart models
pub mod chart;
pub mod reading;
pub mod time_range;
pub mod zone;
