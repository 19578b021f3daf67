/// End-to-end report runs against a log directory on disk
use matmul_log_report::aggregator::derive_speedups;
use matmul_log_report::log_loader::{InMemoryLogs, LogDirectory};
use matmul_log_report::pipeline::{load_tables, run_pipeline, run_report, SUMMARY_FILE};
use matmul_log_report::record::{Implementation, MetricKind, Record};
use matmul_log_report::report_config::ReportConfig;
use matmul_log_report::sinks::RecordingSink;
use std::fs;
use std::path::PathBuf;

const L1_LOG: &str = "\
./matmul_aligned_parallel_N1024_T2.log:     1,078,254,424  L1-dcache-load-misses:u  #   65.23% of all L1-dcache accesses
./matmul_aligned_parallel_N1024_T4.log:     1,001,000,000  L1-dcache-load-misses:u  #   64.10% of all L1-dcache accesses
";

const LLC_LOG: &str = "\
./matmul_aligned_parallel_N1024_T2.log:           367,649  LLC-load-misses:u  #    0.04% of all LL-cache accesses
";

const TIME_LOG: &str = "\
[Naive] N=1024, threads=1, time=34.529702 sec
[Naive] N=1024, threads=8, time=3.358136 sec
[Aligned] N=1024, threads=4, time=5.542523 sec
[Blocked] N=1024, threads=1, time=5.393027 sec
[Blocked] N=1024, threads=8, block_size=64, time=0.866707 sec
";

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("matmul-report-{}-{}", name, std::process::id()));
    fs::remove_dir_all(&dir).ok();
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_report_from_directory() {
    let root = scratch_dir("full");
    let logs = root.join("logs");
    let out = root.join("graphs");
    fs::create_dir_all(&logs).unwrap();

    let config = ReportConfig::new()
        .with_log_directory(&logs)
        .with_output_directory(&out);

    fs::write(config.log_path(MetricKind::L1MissPercent), L1_LOG).unwrap();
    fs::write(config.log_path(MetricKind::LLCMissPercent), LLC_LOG).unwrap();
    fs::write(config.log_path(MetricKind::ExecutionTimeSeconds), TIME_LOG).unwrap();
    // cpu-utilization.txt deliberately missing

    let summary = run_report(&config).unwrap();

    let cpu = summary
        .families
        .iter()
        .find(|f| f.metric == MetricKind::CpuUtilizationPercent)
        .unwrap();
    assert!(!cpu.source_present);
    assert_eq!(cpu.records, 0);

    assert_eq!(summary.total_records(), 2 + 1 + 5);
    assert_eq!(summary.speedup_rows, 2);
    assert_eq!(
        summary.missing_baselines,
        vec![(Implementation::Aligned, Some(1024))]
    );

    assert!(out.join("l1_dcache_percentage_N1024.csv").exists());
    assert!(out.join("exec_time_N1024.csv").exists());
    assert!(out.join("speedup_N1024.csv").exists());
    assert!(!out.join("cpu_utilization_N1024.csv").exists());

    let json = fs::read_to_string(out.join(SUMMARY_FILE)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["speedup_rows"], 2);

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_empty_directory_is_not_an_error() {
    let root = scratch_dir("empty");
    let source = LogDirectory::new(ReportConfig::new().with_log_directory(&root));

    let tables = load_tables(&source).unwrap();

    assert!(tables.metrics.iter().all(|t| t.is_empty()));
    assert!(tables.speedup.is_empty());
    assert!(tables.families.iter().all(|f| !f.source_present));

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_speedup_values() {
    let source = InMemoryLogs::new().with_log(MetricKind::ExecutionTimeSeconds, TIME_LOG);
    let tables = load_tables(&source).unwrap();

    let naive = tables
        .speedup
        .rows
        .iter()
        .find(|r| r.implementation == Implementation::Naive)
        .unwrap();
    assert_eq!(naive.thread_count, 8);
    assert!((naive.speedup - 34.529702 / 3.358136).abs() < 1e-9);

    let blocked = tables
        .speedup
        .rows
        .iter()
        .find(|r| r.implementation == Implementation::Blocked)
        .unwrap();
    assert!((blocked.speedup - 6.2224).abs() < 1e-3);
}

#[test]
fn test_missing_baseline_only_threads_four() {
    let records = vec![Record::new(
        Implementation::Unrolled,
        Some(512),
        4,
        MetricKind::ExecutionTimeSeconds,
        6.388802,
    )
    .unwrap()];

    let table = derive_speedups(&records);
    assert!(table.is_empty());
    assert_eq!(table.missing_baselines, vec![(Implementation::Unrolled, Some(512))]);
}

#[test]
fn test_sink_receives_every_family() {
    let source = InMemoryLogs::new()
        .with_log(MetricKind::L1MissPercent, L1_LOG)
        .with_log(MetricKind::LLCMissPercent, LLC_LOG);
    let mut sink = RecordingSink::new();

    run_pipeline(&source, &mut sink).unwrap();

    let kinds: Vec<MetricKind> = sink.metric_tables.iter().map(|t| t.metric).collect();
    assert_eq!(kinds, MetricKind::ALL.to_vec());
    assert_eq!(sink.rows_for(MetricKind::L1MissPercent).len(), 2);
    assert_eq!(sink.rows_for(MetricKind::LLCMissPercent).len(), 1);
    assert!(sink.speedup_tables[0].is_empty());
}
