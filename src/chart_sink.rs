/// PNG line charts, one per (metric, matrix size)
///
/// x = thread count, one line per implementation. Canvas is 6x4 inches at the
/// configured resolution. Execution times span orders of magnitude across
/// implementations, so their y-axis is logarithmic.
use crate::record::MetricKind;
use crate::report_config::clamp_resolution;
use crate::sinks::{chart_name, SPEEDUP_STEM};
use crate::table::{MetricTable, SpeedupTable};
use crate::traits::RenderSink;
use anyhow::{Context, Result};
use plotters::coord::ranged1d::{AsRangedCoord, DefaultFormatting, Ranged, ValueFormatter};
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const WIDTH_INCHES: u32 = 6;
const HEIGHT_INCHES: u32 = 4;

type Series = BTreeMap<String, Vec<(u32, f64)>>;

pub struct PngChartSink {
    output_directory: PathBuf,
    pixels: (u32, u32),
}

impl PngChartSink {
    pub fn new(output_directory: impl Into<PathBuf>, dpi: u32) -> Result<Self> {
        let output_directory = output_directory.into();
        fs::create_dir_all(&output_directory).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_directory.display()
            )
        })?;

        Ok(Self {
            output_directory,
            pixels: canvas_pixels(dpi),
        })
    }

    fn save<Y>(&self, name: &str, caption: &str, y_desc: &str, series: &Series, y_range: Y) -> Result<PathBuf>
    where
        Y: AsRangedCoord<Value = f64>,
        Y::CoordDescType: Ranged<ValueType = f64, FormatOption = DefaultFormatting> + ValueFormatter<f64>,
    {
        let path = self.output_directory.join(format!("{}.png", name));
        draw_lines(&path, self.pixels, caption, y_desc, series, y_range)
            .with_context(|| format!("Failed to render {}", path.display()))?;
        info!("Saved: {}", path.display());
        Ok(path)
    }
}

impl RenderSink for PngChartSink {
    fn render_metric(&mut self, table: &MetricTable) -> Result<Vec<PathBuf>> {
        if table.is_empty() {
            info!("No {} data to plot.", table.metric);
            return Ok(Vec::new());
        }

        let mut written = Vec::new();
        for size in table.sizes() {
            let log_y = table.metric == MetricKind::ExecutionTimeSeconds;
            let mut series = Series::new();
            for row in table.for_size(size) {
                if log_y && row.value <= 0.0 {
                    debug!(
                        "{} T={} N={}: time {} cannot sit on a log axis, not plotted",
                        row.implementation, row.thread_count, size, row.value
                    );
                    continue;
                }
                series
                    .entry(row.implementation.to_string())
                    .or_default()
                    .push((row.thread_count, row.value));
            }

            let name = chart_name(table.metric.chart_stem(), size);
            let caption = format!("{} (N={})", table.metric.chart_title(), size);
            let y_desc = table.metric.axis_label();
            let path = match table.metric {
                MetricKind::ExecutionTimeSeconds => {
                    self.save(&name, &caption, y_desc, &series, log_range(&series).log_scale())?
                }
                MetricKind::CpuUtilizationPercent => {
                    self.save(&name, &caption, y_desc, &series, 0f64..100.0)?
                }
                _ => self.save(&name, &caption, y_desc, &series, 0f64..headroom(&series))?,
            };
            written.push(path);
        }

        Ok(written)
    }

    fn render_speedup(&mut self, table: &SpeedupTable) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for size in table.sizes() {
            let mut series = Series::new();
            for row in table.for_size(size) {
                series
                    .entry(row.implementation.to_string())
                    .or_default()
                    .push((row.thread_count, row.speedup));
            }

            let caption = format!("Speedup vs. Threads (N={})", size);
            written.push(self.save(
                &chart_name(SPEEDUP_STEM, size),
                &caption,
                "Speedup (T1/Tn)",
                &series,
                0f64..headroom(&series),
            )?);
        }

        Ok(written)
    }

    fn name(&self) -> &str {
        "png"
    }
}

fn headroom(series: &Series) -> f64 {
    let max = series
        .values()
        .flatten()
        .map(|&(_, y)| y)
        .fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Canvas size in pixels, with the resolution kept in the configurable range
fn canvas_pixels(dpi: u32) -> (u32, u32) {
    let dpi = clamp_resolution(dpi);
    (
        WIDTH_INCHES.saturating_mul(dpi),
        HEIGHT_INCHES.saturating_mul(dpi),
    )
}

/// Positive y-range for a log axis, padded on both sides
fn log_range(series: &Series) -> Range<f64> {
    let (min, max) = series
        .values()
        .flatten()
        .map(|&(_, y)| y)
        .filter(|y| *y > 0.0)
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), y| (lo.min(y), hi.max(y)));

    if min.is_finite() {
        min * 0.8..max * 1.25
    } else {
        0.1..1.0
    }
}

fn draw_lines<Y>(
    path: &Path,
    pixels: (u32, u32),
    caption: &str,
    y_desc: &str,
    series: &Series,
    y_range: Y,
) -> Result<()>
where
    Y: AsRangedCoord<Value = f64>,
    Y::CoordDescType: Ranged<ValueType = f64, FormatOption = DefaultFormatting> + ValueFormatter<f64>,
{
    let root = BitMapBackend::new(path, pixels).into_drawing_area();
    root.fill(&WHITE)?;

    let x_max = series
        .values()
        .flatten()
        .map(|&(x, _)| x)
        .max()
        .unwrap_or(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0u32..x_max + 1, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Threads")
        .y_desc(y_desc)
        .draw()?;

    for (idx, (label, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let style = color.stroke_width(2);

        chart
            .draw_series(LineSeries::new(points.iter().copied(), style))?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));

        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}
