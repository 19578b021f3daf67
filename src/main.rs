/// Benchmark log report
///
/// Reads the L1/LLC cache-miss, CPU utilization and execution-time logs of the
/// matrix-multiplication suite and renders one artifact per (metric, matrix size).
///
/// Usage: matmul-log-report [LOG_DIR] [OUTPUT_DIR]
/// Other settings come from `REPORT_*` environment variables (or `.env`).
use matmul_log_report::pipeline::run_report;
use matmul_log_report::report_config::ReportConfig;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // Load .env file if present (fails silently if not found)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_target(false).init();

    let mut config = match ReportConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("❌ Configuration error: {}", e);
            tracing::error!("💡 REPORT_DPI must be an integer, e.g. REPORT_DPI=300");
            std::process::exit(1);
        }
    };

    let mut args = std::env::args().skip(1);
    if let Some(log_dir) = args.next() {
        config = config.with_log_directory(log_dir);
    }
    if let Some(output_dir) = args.next() {
        config = config.with_output_directory(output_dir);
    }

    config.log_config();

    let summary = run_report(&config)?;
    summary.print();

    info!(
        "All artifacts saved in: {}",
        config.output_directory.display()
    );

    Ok(())
}
