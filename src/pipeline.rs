/// Report pipeline: raw logs → records → tables → render sink
///
/// Every stage is pluggable through the traits in [`crate::traits`]; the
/// `run_report` entry point wires the on-disk defaults from a [`ReportConfig`].
use crate::aggregator::derive_speedups;
use crate::cache_miss_parser::CacheMissParser;
use crate::cpu_util_parser::CpuUtilizationParser;
use crate::exec_time_parser::ExecutionTimeParser;
use crate::log_format_detector::LogFormatDetector;
use crate::log_loader::LogDirectory;
use crate::record::{Implementation, MetricKind};
use crate::report_config::ReportConfig;
use crate::table::{MetricTable, SpeedupTable};
use crate::traits::{LineParser, LogSource, ParseOutcome, RenderSink};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const SUMMARY_FILE: &str = "report_summary.json";

/// The parser responsible for a metric family
pub fn parser_for(kind: MetricKind) -> Box<dyn LineParser + Send + Sync> {
    match kind {
        MetricKind::L1MissPercent => Box::new(CacheMissParser::l1()),
        MetricKind::LLCMissPercent => Box::new(CacheMissParser::llc()),
        MetricKind::CpuUtilizationPercent => Box::new(CpuUtilizationParser::new()),
        MetricKind::ExecutionTimeSeconds => Box::new(ExecutionTimeParser::new()),
    }
}

/// What happened to one family's log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyReport {
    pub metric: MetricKind,
    pub source_present: bool,
    pub records: usize,
    pub noise_lines: usize,
    pub unparseable_lines: usize,
    pub malformed_records: usize,
    /// Family most lines of the log look like
    pub detected_family: Option<MetricKind>,
}

/// All tables of one run
#[derive(Debug, Clone)]
pub struct ReportTables {
    /// In `MetricKind::ALL` order
    pub metrics: Vec<MetricTable>,
    pub speedup: SpeedupTable,
    pub families: Vec<FamilyReport>,
}

impl ReportTables {
    pub fn table(&self, kind: MetricKind) -> Option<&MetricTable> {
        self.metrics.iter().find(|t| t.metric == kind)
    }
}

/// Parse one family's text; a missing log yields an empty table
pub fn parse_family(kind: MetricKind, text: Option<&str>) -> (MetricTable, FamilyReport) {
    let Some(text) = text else {
        let report = FamilyReport {
            metric: kind,
            source_present: false,
            records: 0,
            noise_lines: 0,
            unparseable_lines: 0,
            malformed_records: 0,
            detected_family: None,
        };
        return (MetricTable::empty(kind), report);
    };

    let parser = parser_for(kind);
    let ParseOutcome {
        records,
        noise_lines,
        unparseable_lines,
        malformed_records,
    } = parser.parse_with_stats(text);

    let detected_family = LogFormatDetector::detect_dominant(text);
    if let Some(detected) = detected_family {
        if detected != kind {
            warn!(
                "{} log looks like {} output, check the configured file names",
                kind, detected
            );
        }
    }

    info!(
        "Parsed {} {} records with {} ({} noise, {} unparseable, {} malformed)",
        records.len(),
        kind,
        parser.name(),
        noise_lines,
        unparseable_lines,
        malformed_records
    );

    let report = FamilyReport {
        metric: kind,
        source_present: true,
        records: records.len(),
        noise_lines,
        unparseable_lines,
        malformed_records,
        detected_family,
    };

    (MetricTable::new(kind, records), report)
}

/// Load every family from `source`, parse them in parallel and derive speedup
pub fn load_tables<S: LogSource>(source: &S) -> Result<ReportTables> {
    info!("📝 Loading logs from {}", source.name());

    let mut texts = Vec::with_capacity(MetricKind::ALL.len());
    for kind in MetricKind::ALL {
        texts.push((kind, source.load(kind)?));
    }

    let parsed: Vec<(MetricTable, FamilyReport)> = texts
        .par_iter()
        .map(|(kind, text)| parse_family(*kind, text.as_deref()))
        .collect();

    let (metrics, families): (Vec<_>, Vec<_>) = parsed.into_iter().unzip();

    let speedup = metrics
        .iter()
        .find(|t| t.metric == MetricKind::ExecutionTimeSeconds)
        .map(|t| derive_speedups(&t.records))
        .unwrap_or_default();

    if !speedup.missing_baselines.is_empty() {
        info!(
            "{} (implementation, size) keys have no single-thread baseline",
            speedup.missing_baselines.len()
        );
    }

    Ok(ReportTables {
        metrics,
        speedup,
        families,
    })
}

/// Summary of a report run
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub sink: String,
    pub families: Vec<FamilyReport>,
    pub speedup_rows: usize,
    pub missing_baselines: Vec<(Implementation, Option<u32>)>,
    pub artifacts: Vec<PathBuf>,
}

impl ReportSummary {
    pub fn total_records(&self) -> usize {
        self.families.iter().map(|f| f.records).sum()
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write summary: {}", path.display()))
    }

    /// Pretty-print the summary
    pub fn print(&self) {
        println!("\n{}", "=".repeat(80));
        println!("📊 Benchmark Log Report");
        println!("{}\n", "=".repeat(80));

        println!("   Source: {}", self.source);
        println!("   Sink:   {}", self.sink);
        println!("   Generated at: {}\n", self.generated_at.to_rfc3339());

        println!("📈 Metric families:");
        for family in &self.families {
            if !family.source_present {
                println!("   {:<22} {:>10}", family.metric.to_string(), "missing");
                continue;
            }
            println!(
                "   {:<22} {:>10} records  ({} noise, {} unparseable, {} malformed)",
                family.metric.to_string(),
                family.records,
                family.noise_lines,
                family.unparseable_lines,
                family.malformed_records
            );
        }

        println!("\n🚀 Speedup:");
        println!("   Derived rows:            {:>10}", self.speedup_rows);
        println!(
            "   Keys without baseline:   {:>10}",
            self.missing_baselines.len()
        );
        for (implementation, size) in &self.missing_baselines {
            match size {
                Some(size) => println!("     - {} N={}", implementation, size),
                None => println!("     - {} (no size)", implementation),
            }
        }

        println!("\n💾 Artifacts: {}", self.artifacts.len());
        for artifact in &self.artifacts {
            println!("   {}", artifact.display());
        }

        println!("\n{}", "=".repeat(80));
    }
}

/// Run the pipeline with injected source and sink
pub fn run_pipeline<S, K>(source: &S, sink: &mut K) -> Result<ReportSummary>
where
    S: LogSource,
    K: RenderSink,
{
    let tables = load_tables(source)?;

    let mut artifacts = Vec::new();
    for table in &tables.metrics {
        artifacts.extend(sink.render_metric(table)?);
    }
    artifacts.extend(sink.render_speedup(&tables.speedup)?);

    Ok(ReportSummary {
        generated_at: Utc::now(),
        source: source.name().to_string(),
        sink: sink.name().to_string(),
        speedup_rows: tables.speedup.len(),
        missing_baselines: tables.speedup.missing_baselines,
        families: tables.families,
        artifacts,
    })
}

/// Entry point: read the configured log directory, render into the output directory
///
/// Writes `report_summary.json` next to the rendered artifacts.
pub fn run_report(config: &ReportConfig) -> Result<ReportSummary> {
    let source = LogDirectory::new(config.clone());
    let mut sink = default_sink(config)?;

    let summary = run_pipeline(&source, &mut sink)?;
    summary.write_json(&config.output_path(SUMMARY_FILE))?;

    Ok(summary)
}

#[cfg(not(feature = "charts"))]
fn default_sink(config: &ReportConfig) -> Result<crate::sinks::CsvTableSink> {
    crate::sinks::CsvTableSink::new(&config.output_directory)
}

#[cfg(feature = "charts")]
fn default_sink(config: &ReportConfig) -> Result<crate::chart_sink::PngChartSink> {
    crate::chart_sink::PngChartSink::new(&config.output_directory, config.render_resolution)
}
