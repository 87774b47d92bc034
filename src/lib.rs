// Zone-aligned climate chart series from independently sampled sensors
pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
mod test_support;
