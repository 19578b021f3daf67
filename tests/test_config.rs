/// Test report configuration
use matmul_log_report::record::MetricKind;
use matmul_log_report::report_config::{MetricFileNames, ReportConfig, MAX_RENDER_RESOLUTION};
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = ReportConfig::default();

    println!("Default configuration:");
    println!("  Log directory: {}", config.log_directory.display());
    println!("  Output directory: {}", config.output_directory.display());
    println!("  Render resolution: {}", config.render_resolution);

    assert_eq!(
        config.log_path(MetricKind::L1MissPercent),
        PathBuf::from("logs/final_results/L1-dcache-load-misses.txt")
    );
    assert_eq!(
        config.log_path(MetricKind::CpuUtilizationPercent),
        PathBuf::from("logs/final_results/cpu-utilization.txt")
    );
    assert_eq!(config.render_resolution, 300);
}

#[test]
fn test_custom_config() {
    let config = ReportConfig::new()
        .with_log_directory("runs/2024-12")
        .with_file_names(MetricFileNames {
            time: "timings.log".to_string(),
            ..Default::default()
        })
        .with_render_resolution(150);

    assert_eq!(
        config.log_path(MetricKind::ExecutionTimeSeconds),
        PathBuf::from("runs/2024-12/timings.log")
    );
    assert_eq!(
        config.log_path(MetricKind::LLCMissPercent),
        PathBuf::from("runs/2024-12/LLC-load-misses.txt")
    );
    assert_eq!(config.render_resolution, 150);
}

#[test]
fn test_config_from_env() {
    // Only test in this binary touching the environment
    std::env::set_var("REPORT_OUTPUT_DIR", "/tmp/report-out");
    std::env::set_var("REPORT_CPU_FILE", "vtune.txt");
    std::env::set_var("REPORT_DPI", "72");

    let config = ReportConfig::from_env().unwrap();
    assert_eq!(config.output_directory, PathBuf::from("/tmp/report-out"));
    assert_eq!(config.file_names.cpu, "vtune.txt");
    assert_eq!(config.render_resolution, 72);

    std::env::set_var("REPORT_DPI", "0");
    assert_eq!(ReportConfig::from_env().unwrap().render_resolution, 1);

    std::env::set_var("REPORT_DPI", "99999");
    assert_eq!(
        ReportConfig::from_env().unwrap().render_resolution,
        MAX_RENDER_RESOLUTION
    );

    std::env::set_var("REPORT_DPI", "retina");
    assert!(ReportConfig::from_env().is_err());

    std::env::remove_var("REPORT_OUTPUT_DIR");
    std::env::remove_var("REPORT_CPU_FILE");
    std::env::remove_var("REPORT_DPI");
}

#[test]
fn test_config_serialization() {
    let config = ReportConfig::new().with_output_directory("out");
    let json = serde_json::to_string(&config).unwrap();
    let back: ReportConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
