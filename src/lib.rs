// Record model
pub mod error;
pub mod record;
pub mod table;

// Log parsing
pub mod cache_miss_parser;
pub mod cpu_util_parser;
pub mod exec_time_parser;
pub mod filename_tags;
pub mod log_format_detector;

// Aggregation and report plumbing
pub mod aggregator;
pub mod log_loader;
pub mod pipeline;
pub mod report_config;
pub mod sinks;
pub mod traits;

#[cfg(feature = "charts")]
pub mod chart_sink; // PNG rendering via plotters
