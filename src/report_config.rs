/// Report configuration: log and output locations plus chart resolution
///
/// Defaults can be overridden from `REPORT_*` environment variables or the builder.
use crate::record::MetricKind;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Highest accepted chart resolution; larger values are clamped to it
pub const MAX_RENDER_RESOLUTION: u32 = 1200;

/// File name of each metric family's log inside the log directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricFileNames {
    pub l1: String,
    pub llc: String,
    pub cpu: String,
    pub time: String,
}

impl Default for MetricFileNames {
    fn default() -> Self {
        Self {
            l1: "L1-dcache-load-misses.txt".to_string(),
            llc: "LLC-load-misses.txt".to_string(),
            cpu: "cpu-utilization.txt".to_string(),
            time: "execution-time.txt".to_string(),
        }
    }
}

impl MetricFileNames {
    pub fn for_kind(&self, kind: MetricKind) -> &str {
        match kind {
            MetricKind::L1MissPercent => &self.l1,
            MetricKind::LLCMissPercent => &self.llc,
            MetricKind::CpuUtilizationPercent => &self.cpu,
            MetricKind::ExecutionTimeSeconds => &self.time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub log_directory: PathBuf,
    pub output_directory: PathBuf,
    pub file_names: MetricFileNames,
    /// Dots per inch for rendered charts
    pub render_resolution: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            log_directory: PathBuf::from("logs/final_results"),
            output_directory: PathBuf::from("graphs"),
            file_names: MetricFileNames::default(),
            render_resolution: 300,
        }
    }
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `REPORT_*` environment variables
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();

        if let Ok(dir) = env::var("REPORT_LOG_DIR") {
            config.log_directory = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("REPORT_OUTPUT_DIR") {
            config.output_directory = PathBuf::from(dir);
        }
        if let Ok(name) = env::var("REPORT_L1_FILE") {
            config.file_names.l1 = name;
        }
        if let Ok(name) = env::var("REPORT_LLC_FILE") {
            config.file_names.llc = name;
        }
        if let Ok(name) = env::var("REPORT_CPU_FILE") {
            config.file_names.cpu = name;
        }
        if let Ok(name) = env::var("REPORT_TIME_FILE") {
            config.file_names.time = name;
        }
        if let Ok(dpi) = env::var("REPORT_DPI") {
            config.render_resolution = parse_resolution(&dpi)?;
        }

        Ok(config)
    }

    pub fn with_log_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_directory = dir.into();
        self
    }

    pub fn with_output_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_directory = dir.into();
        self
    }

    pub fn with_file_names(mut self, file_names: MetricFileNames) -> Self {
        self.file_names = file_names;
        self
    }

    /// Resolution is clamped to `1..=MAX_RENDER_RESOLUTION`, as for `REPORT_DPI`
    pub fn with_render_resolution(mut self, dpi: u32) -> Self {
        self.render_resolution = clamp_resolution(dpi);
        self
    }

    /// Full path of a family's log file
    pub fn log_path(&self, kind: MetricKind) -> PathBuf {
        self.log_directory.join(self.file_names.for_kind(kind))
    }

    pub fn output_path(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.output_directory.join(file_name)
    }

    pub fn log_config(&self) {
        tracing::info!("📋 Configuration:");
        tracing::info!("   Log directory: {}", self.log_directory.display());
        tracing::info!("   Output directory: {}", self.output_directory.display());
        for kind in MetricKind::ALL {
            tracing::info!("   {} log: {}", kind, self.file_names.for_kind(kind));
        }
        tracing::info!("   Render resolution: {} dpi", self.render_resolution);
    }
}

/// Keep a resolution inside `1..=MAX_RENDER_RESOLUTION`
pub fn clamp_resolution(dpi: u32) -> u32 {
    dpi.clamp(1, MAX_RENDER_RESOLUTION)
}

fn parse_resolution(value: &str) -> Result<u32, String> {
    let dpi = value
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("REPORT_DPI must be an integer ({}): {}", value, e))?;

    let clamped = clamp_resolution(dpi);
    if clamped != dpi {
        tracing::warn!(
            "REPORT_DPI={} out of range, using {} dpi (allowed 1..={})",
            dpi,
            clamped,
            MAX_RENDER_RESOLUTION
        );
    }
    Ok(clamped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.log_directory, PathBuf::from("logs/final_results"));
        assert_eq!(config.output_directory, PathBuf::from("graphs"));
        assert_eq!(config.file_names.l1, "L1-dcache-load-misses.txt");
        assert_eq!(config.render_resolution, 300);
    }

    #[test]
    fn test_builder() {
        let config = ReportConfig::new()
            .with_log_directory("/tmp/logs")
            .with_output_directory("/tmp/out")
            .with_render_resolution(0);

        assert_eq!(config.log_path(MetricKind::ExecutionTimeSeconds), PathBuf::from("/tmp/logs/execution-time.txt"));
        assert_eq!(config.output_path("speedup_N64.csv"), PathBuf::from("/tmp/out/speedup_N64.csv"));
        assert_eq!(config.render_resolution, 1);

        let config = ReportConfig::new().with_render_resolution(u32::MAX);
        assert_eq!(config.render_resolution, MAX_RENDER_RESOLUTION);
    }

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("150"), Ok(150));
        assert_eq!(parse_resolution(" 72 "), Ok(72));
        assert!(parse_resolution("high").is_err());
        assert!(parse_resolution("-5").is_err());
    }

    #[test]
    fn test_env_and_builder_agree_on_range() {
        for dpi in [0, 1, 300, MAX_RENDER_RESOLUTION, MAX_RENDER_RESOLUTION + 1, u32::MAX] {
            let from_builder = ReportConfig::new().with_render_resolution(dpi).render_resolution;
            assert_eq!(parse_resolution(&dpi.to_string()), Ok(from_builder));
        }
    }
}
