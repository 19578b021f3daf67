/// Render sinks that need nothing beyond the default feature set
use crate::record::MetricKind;
use crate::table::{MetricTable, SpeedupRecord, SpeedupTable, TableRow};
use crate::traits::RenderSink;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SPEEDUP_STEM: &str = "speedup";

/// Artifact stem for one (family, size) grouping, e.g. `exec_time_N1024`
pub fn chart_name(stem: &str, size: u32) -> String {
    format!("{}_N{}", stem, size)
}

/// Writes chart-ready CSV files: one per family plus one per (family, size)
pub struct CsvTableSink {
    output_directory: PathBuf,
}

impl CsvTableSink {
    pub fn new(output_directory: impl Into<PathBuf>) -> Result<Self> {
        let output_directory = output_directory.into();
        fs::create_dir_all(&output_directory).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_directory.display()
            )
        })?;
        Ok(Self { output_directory })
    }

    fn write_rows<T: Serialize>(&self, name: &str, rows: &[T]) -> Result<PathBuf> {
        let path = self.output_directory.join(format!("{}.csv", name));
        write_csv(&path, rows)?;
        info!("Saved: {}", path.display());
        Ok(path)
    }
}

impl RenderSink for CsvTableSink {
    fn render_metric(&mut self, table: &MetricTable) -> Result<Vec<PathBuf>> {
        if table.is_empty() {
            info!("No {} data to render.", table.metric);
            return Ok(Vec::new());
        }

        let stem = table.metric.chart_stem();
        let mut written = vec![self.write_rows(stem, &table.rows())?];

        for size in table.sizes() {
            written.push(self.write_rows(&chart_name(stem, size), &table.for_size(size))?);
        }

        Ok(written)
    }

    fn render_speedup(&mut self, table: &SpeedupTable) -> Result<Vec<PathBuf>> {
        if table.is_empty() {
            info!("No speedup data to render.");
            return Ok(Vec::new());
        }

        let mut written = vec![self.write_rows(SPEEDUP_STEM, &table.rows)?];

        for size in table.sizes() {
            let rows: Vec<&SpeedupRecord> = table.for_size(size);
            written.push(self.write_rows(&chart_name(SPEEDUP_STEM, size), &rows)?);
        }

        Ok(written)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Keeps every table it is handed, for tests and dry runs
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub metric_tables: Vec<MetricTable>,
    pub speedup_tables: Vec<SpeedupTable>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metric_table(&self, kind: MetricKind) -> Option<&MetricTable> {
        self.metric_tables.iter().find(|t| t.metric == kind)
    }

    pub fn rows_for(&self, kind: MetricKind) -> Vec<TableRow> {
        self.metric_table(kind)
            .map(MetricTable::rows)
            .unwrap_or_default()
    }
}

impl RenderSink for RecordingSink {
    fn render_metric(&mut self, table: &MetricTable) -> Result<Vec<PathBuf>> {
        self.metric_tables.push(table.clone());
        let stem = table.metric.chart_stem();
        Ok(table
            .sizes()
            .into_iter()
            .map(|size| PathBuf::from(chart_name(stem, size)))
            .collect())
    }

    fn render_speedup(&mut self, table: &SpeedupTable) -> Result<Vec<PathBuf>> {
        self.speedup_tables.push(table.clone());
        Ok(table
            .sizes()
            .into_iter()
            .map(|size| PathBuf::from(chart_name(SPEEDUP_STEM, size)))
            .collect())
    }

    fn name(&self) -> &str {
        "recording"
    }
}
